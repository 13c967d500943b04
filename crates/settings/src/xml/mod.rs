//! XML document façade for settings files.
//!
//! Responsibilities:
//! - Check well-formedness with `roxmltree` and build an owned [`Element`] tree.
//! - Answer slash-path queries such as `/settings/servers/server`.
//! - Serialize the tree back to text.
//!
//! Does NOT handle:
//! - Filesystem access of any kind.
//! - DTDs: documents carrying a DOCTYPE are rejected as malformed.
//!
//! Invariants:
//! - Tags and character content are sliced out of the source using the byte
//!   ranges `roxmltree` reports, so `parse(text)?.serialize() == text` for
//!   every accepted document.

mod element;

pub use element::{Content, Element, Node, is_xml_text};

use crate::constants::SETTINGS;
use crate::error::{Result, SettingsError};

/// A parsed settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDocument {
    /// Everything before the root element: XML declaration, comments, whitespace.
    prolog: String,
    root: Element,
    /// Everything after the root element.
    epilogue: String,
}

impl SettingsDocument {
    /// Parse `text` into a document.
    ///
    /// # Errors
    /// Returns [`SettingsError::MalformedDocument`] if `text` is not well-formed XML.
    pub fn parse(text: &str) -> Result<Self> {
        let document = roxmltree::Document::parse(text)
            .map_err(|e| SettingsError::malformed(e.to_string()))?;

        let root = document.root_element();
        let range = root.range();
        let element = build_element(text, root)?;

        Ok(Self {
            prolog: text[..range.start].to_string(),
            root: element,
            epilogue: text[range.end..].to_string(),
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The `<settings>` root element.
    ///
    /// # Errors
    /// Returns [`SettingsError::MalformedDocument`] if the root has another name.
    pub fn settings_mut(&mut self) -> Result<&mut Element> {
        if self.root.name() != SETTINGS {
            return Err(SettingsError::malformed(format!(
                "root element is <{}>, expected <{SETTINGS}>",
                self.root.name()
            )));
        }
        Ok(&mut self.root)
    }

    /// Elements matching an absolute slash path of local names.
    ///
    /// `/settings/servers/server` returns every `server` under every
    /// `servers` under the root, in document order.
    pub fn query(&self, path: &str) -> Vec<&Element> {
        let mut steps = path.split('/').filter(|step| !step.is_empty());
        let Some(first) = steps.next() else {
            return Vec::new();
        };
        if self.root.name() != first {
            return Vec::new();
        }

        let mut current = vec![&self.root];
        for step in steps {
            current = current
                .into_iter()
                .flat_map(|element| element.children_named(step))
                .collect();
        }
        current
    }

    /// Render the document back to XML text.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.prolog.len() + self.epilogue.len() + 1024);
        out.push_str(&self.prolog);
        self.root.write_to(&mut out);
        out.push_str(&self.epilogue);
        out
    }
}

fn build_element(source: &str, node: roxmltree::Node<'_, '_>) -> Result<Element> {
    let range = node.range();
    let raw = &source[range.clone()];
    let start_len = start_tag_len(raw).ok_or_else(|| {
        SettingsError::malformed(format!("unterminated start tag at byte {}", range.start))
    })?;
    let start_tag = &raw[..start_len];
    let qualified_name = qualified_name(start_tag);

    if start_len == raw.len() {
        return Ok(Element::from_source(qualified_name, start_tag, None, Vec::new()));
    }

    let end_offset = raw
        .rfind("</")
        .filter(|offset| *offset >= start_len)
        .ok_or_else(|| {
            SettingsError::malformed(format!("missing end tag for <{qualified_name}>"))
        })?;
    let end_tag = &raw[end_offset..];
    let content_end = range.start + end_offset;

    let mut children = Vec::new();
    let mut cursor = range.start + start_len;
    let mut pending_text = String::new();

    for child in node.children() {
        if child.is_element() {
            let child_range = child.range();
            if child_range.start > cursor {
                children.push(Node::Content(Content::verbatim(
                    &source[cursor..child_range.start],
                    std::mem::take(&mut pending_text),
                )));
            }
            children.push(Node::Element(build_element(source, child)?));
            cursor = child_range.end;
        } else if child.is_text() {
            pending_text.push_str(child.text().unwrap_or_default());
        }
    }

    if content_end > cursor {
        children.push(Node::Content(Content::verbatim(
            &source[cursor..content_end],
            pending_text,
        )));
    }

    Ok(Element::from_source(
        qualified_name,
        start_tag,
        Some(end_tag),
        children,
    ))
}

/// Length of the start tag at the beginning of `raw`, honoring quoted
/// attribute values that may contain `>`.
fn start_tag_len(raw: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (index, ch) in raw.char_indices().skip(1) {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '>') => return Some(index + 1),
            (None, _) => {}
        }
    }
    None
}

fn qualified_name(start_tag: &str) -> &str {
    let name = &start_tag[1..];
    let end = name
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(name.len());
    &name[..end]
}
