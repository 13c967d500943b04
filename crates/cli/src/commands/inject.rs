//! `inject` command: render a settings template with credentials.
//!
//! Responsibilities:
//! - Resolve configuration (CLI flags over `MVN_SETTINGS_*` over defaults).
//! - Run server injection, then proxy injection, on the template.
//! - Write the result and, if asked, a manifest of materialized key files.
//!
//! Does NOT handle:
//! - Deleting key files after a successful run (see `cleanup`).
//!
//! Invariants:
//! - If any step after key materialization fails, the key files of this run are removed.
//! - The output file is replaced atomically, never partially written.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mvn_settings::{Credential, fill_authentication, fill_proxy_authentication};
use mvn_settings_config::{ConfigLoader, CredentialsFile, InjectConfig, ResolvedCredentials};

use crate::args::InjectArgs;
use crate::manifest::Manifest;
use crate::output::write_to_file;

pub fn run(args: InjectArgs) -> Result<()> {
    let config = load_config(&args)?;
    tracing::debug!(
        scratch_dir = %config.scratch_dir.display(),
        replace_all = config.replace_all,
        "Resolved configuration"
    );

    let settings = fs::read_to_string(&args.settings)
        .with_context(|| format!("Failed to read settings file: {}", args.settings.display()))?;

    let credentials = match &config.credentials_path {
        Some(path) => CredentialsFile::load_resolved(path)?,
        None => {
            tracing::debug!("No credentials file configured");
            ResolvedCredentials::default()
        }
    };

    let mut temp_files = Vec::new();
    let result = render(&settings, &config, &credentials, &mut temp_files)
        .and_then(|rendered| write_outputs(&rendered, &args, &temp_files));

    if let Err(e) = result {
        remove_files(&temp_files);
        return Err(e);
    }
    Ok(())
}

fn load_config(args: &InjectArgs) -> Result<InjectConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(dir) = &args.scratch_dir {
        loader = loader.with_scratch_dir(dir.clone());
    }
    if let Some(replace_all) = args.replace_all() {
        loader = loader.with_replace_all(replace_all);
    }
    if let Some(path) = &args.credentials {
        loader = loader.with_credentials_path(path.clone());
    }

    let config = loader
        .from_env()
        .context("Failed to load configuration from environment")?
        .build()
        .context("Failed to build configuration")?;
    Ok(config)
}

fn render(
    settings: &str,
    config: &InjectConfig,
    credentials: &ResolvedCredentials,
    temp_files: &mut Vec<PathBuf>,
) -> Result<String> {
    let needs_scratch = credentials
        .servers
        .values()
        .any(|c| matches!(c, Credential::UsernamePrivateKey { .. }));
    if needs_scratch {
        fs::create_dir_all(&config.scratch_dir).with_context(|| {
            format!(
                "Failed to create scratch directory: {}",
                config.scratch_dir.display()
            )
        })?;
    }

    let with_servers = fill_authentication(
        settings,
        config.replace_all,
        &credentials.servers,
        &config.scratch_dir,
        temp_files,
    )
    .context("Failed to inject server credentials")?;

    let fill = fill_proxy_authentication(&with_servers, &credentials.proxies)
        .context("Failed to inject proxy credentials")?;

    for skipped in &fill.skipped {
        tracing::warn!(id = %skipped.id, "Proxy credential skipped");
        eprintln!("Warning: {}", skipped.reason);
    }

    Ok(fill.settings)
}

fn write_outputs(rendered: &str, args: &InjectArgs, temp_files: &[PathBuf]) -> Result<()> {
    match &args.output {
        Some(path) => {
            write_to_file(rendered, path)
                .with_context(|| format!("Failed to write settings to {}", path.display()))?;
            eprintln!("Settings written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    match &args.manifest {
        Some(path) => {
            Manifest::new(temp_files.to_vec()).save(path)?;
            tracing::debug!(path = %path.display(), files = temp_files.len(), "Wrote manifest");
        }
        None if !temp_files.is_empty() => {
            eprintln!("Materialized {} key file(s):", temp_files.len());
            for path in temp_files {
                eprintln!("  {}", path.display());
            }
        }
        None => {}
    }

    Ok(())
}

fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove key file");
        }
    }
}

/// Remove a file, treating "already gone" as success. Returns whether a file was removed.
pub(crate) fn remove_file(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
