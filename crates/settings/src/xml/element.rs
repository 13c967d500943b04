//! Owned XML element tree with verbatim pass-through of unmodified markup.
//!
//! Responsibilities:
//! - Hold elements as owned, ordered child sequences (no back-references).
//! - Keep start tags, end tags and character content as their original source text.
//! - Provide the child-list surgery the injectors need (lookup, set, insert, remove).
//!
//! Invariants:
//! - An element that is never mutated serializes to exactly its source bytes.
//! - `Content::raw` is always valid XML markup; `Content::text` is its decoded character data.
//! - Removing an element also removes the whitespace-only content that indented it.

use std::borrow::Cow;

use crate::constants::DEFAULT_INDENT_UNIT;

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Content(Content),
}

/// A run of character-level markup between elements.
///
/// `raw` may contain text, entity references, CDATA sections, comments and
/// processing instructions exactly as they appeared in the source. `text`
/// holds only the decoded character data of that run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    raw: String,
    text: String,
}

impl Content {
    pub(crate) fn verbatim(raw: &str, text: String) -> Self {
        Self {
            raw: raw.to_string(),
            text,
        }
    }

    /// Character data that will be escaped on output.
    pub fn text(text: &str) -> Self {
        Self {
            raw: escape_text(text).into_owned(),
            text: text.to_string(),
        }
    }

    fn whitespace(ws: &str) -> Self {
        Self {
            raw: ws.to_string(),
            text: ws.to_string(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn decoded(&self) -> &str {
        &self.text
    }

    /// True when the run is nothing but whitespace (no comments, no text).
    pub fn is_whitespace(&self) -> bool {
        self.raw.chars().all(char::is_whitespace)
    }
}

/// An XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Local name, namespace prefix stripped.
    name: String,
    /// Name as written in the tags, prefix included.
    qualified_name: String,
    /// `<name attr="...">` or `<name attr="..."/>` as in the source.
    start_tag: String,
    /// `None` for self-closing elements.
    end_tag: Option<String>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty `<name></name>` element.
    pub fn new(name: &str) -> Self {
        Self {
            name: local_name(name).to_string(),
            qualified_name: name.to_string(),
            start_tag: format!("<{name}>"),
            end_tag: Some(format!("</{name}>")),
            children: Vec::new(),
        }
    }

    /// Create `<name>text</name>`.
    pub fn with_text(name: &str, text: &str) -> Self {
        let mut element = Self::new(name);
        element.set_text(text);
        element
    }

    pub(crate) fn from_source(
        qualified_name: &str,
        start_tag: &str,
        end_tag: Option<&str>,
        children: Vec<Node>,
    ) -> Self {
        Self {
            name: local_name(qualified_name).to_string(),
            qualified_name: qualified_name.to_string(),
            start_tag: start_tag.to_string(),
            end_tag: end_tag.map(str::to_string),
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Content(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Content(_) => None,
        })
    }

    /// Child elements with the given local name.
    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'n> {
        self.elements().filter(move |element| element.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children_named(name).next()
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|element| element.name == name)
    }

    /// String value of the element: all descendant character data, concatenated.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(element) => element.collect_text(out),
                Node::Content(content) => out.push_str(&content.text),
            }
        }
    }

    /// Trimmed text of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|child| child.text().trim().to_string())
    }

    /// Replace every child with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.open();
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Content(Content::text(text)));
        }
    }

    /// Set the text of the first child named `name`, appending the child if absent.
    pub fn set_child_text(&mut self, name: &str, text: &str) {
        match self.child_mut(name) {
            Some(child) => child.set_text(text),
            None => {
                self.append_child(Self::with_text(name, text));
            }
        }
    }

    /// Return the first child named `name`, appending an empty one if absent.
    pub fn child_or_append(&mut self, name: &str) -> &mut Element {
        let index = match self.position_of(name) {
            Some(index) => index,
            None => {
                let mut child = Self::new(name);
                if let Some(indent) = self.child_indent() {
                    child.push_whitespace(&indent);
                }
                self.append_child(child)
            }
        };
        match &mut self.children[index] {
            Node::Element(element) => element,
            Node::Content(_) => unreachable!("position_of and append_child return element indices"),
        }
    }

    /// Append a whitespace-only run at the end of the children.
    ///
    /// Used to give a freshly created container the indentation of its closing tag.
    pub fn push_whitespace(&mut self, ws: &str) {
        self.open();
        self.children.push(Node::Content(Content::whitespace(ws)));
    }

    /// Append `child` after the last element, indented like its siblings.
    ///
    /// Returns the index of the child in [`Element::children`].
    pub fn append_child(&mut self, child: Element) -> usize {
        self.open();
        let indent = self.child_indent();
        let mut at = match self.children.last() {
            Some(Node::Content(content)) if content.is_whitespace() => self.children.len() - 1,
            _ => self.children.len(),
        };
        if let Some(indent) = indent {
            self.children
                .insert(at, Node::Content(Content::whitespace(&indent)));
            at += 1;
        }
        self.children.insert(at, Node::Element(child));
        at
    }

    /// Insert `new_children` right after the first child named `anchor`.
    ///
    /// Falls back to appending when there is no such child.
    pub fn insert_after(&mut self, anchor: &str, new_children: Vec<Element>) {
        let Some(anchor_index) = self.position_of(anchor) else {
            for child in new_children {
                self.append_child(child);
            }
            return;
        };

        let indent = match anchor_index.checked_sub(1).map(|i| &self.children[i]) {
            Some(Node::Content(content)) if content.is_whitespace() => Some(content.raw.clone()),
            _ => None,
        };

        let mut at = anchor_index + 1;
        for child in new_children {
            if let Some(indent) = &indent {
                self.children
                    .insert(at, Node::Content(Content::whitespace(indent)));
                at += 1;
            }
            self.children.insert(at, Node::Element(child));
            at += 1;
        }
    }

    /// Keep only the child elements for which `keep` returns true.
    ///
    /// Returns the number of removed elements.
    pub fn retain_elements<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Element) -> bool,
    {
        let before = self.children.len();
        let mut removed = 0;
        let mut kept: Vec<Node> = Vec::with_capacity(before);
        for node in self.children.drain(..) {
            match node {
                Node::Element(element) if !keep(&element) => {
                    removed += 1;
                    let indented = matches!(
                        kept.last(),
                        Some(Node::Content(content)) if content.is_whitespace()
                    );
                    if indented {
                        kept.pop();
                    }
                }
                node => kept.push(node),
            }
        }
        self.children = kept;
        removed
    }

    /// Indentation to put in front of a new child element.
    ///
    /// Copies the whitespace in front of the last existing child element, or
    /// derives it from the closing-tag indentation when there is none.
    pub fn child_indent(&self) -> Option<String> {
        let last_element = self
            .children
            .iter()
            .rposition(|node| matches!(node, Node::Element(_)));

        if let Some(index) = last_element {
            return match index.checked_sub(1).map(|i| &self.children[i]) {
                Some(Node::Content(content)) if content.is_whitespace() => {
                    Some(content.raw.clone())
                }
                _ => None,
            };
        }

        match self.children.last() {
            Some(Node::Content(content))
                if content.is_whitespace() && content.raw.contains('\n') =>
            {
                Some(format!("{}{}", content.raw, DEFAULT_INDENT_UNIT))
            }
            _ => None,
        }
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(element) if element.name == name))
    }

    /// Turn a self-closing element into an open/close pair so it can hold children.
    fn open(&mut self) {
        if self.end_tag.is_some() {
            return;
        }
        let trimmed = self
            .start_tag
            .strip_suffix("/>")
            .unwrap_or(&self.start_tag)
            .trim_end();
        self.start_tag = format!("{trimmed}>");
        self.end_tag = Some(format!("</{}>", self.qualified_name));
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        out.push_str(&self.start_tag);
        for node in &self.children {
            match node {
                Node::Element(element) => element.write_to(out),
                Node::Content(content) => out.push_str(&content.raw),
            }
        }
        if let Some(end_tag) = &self.end_tag {
            out.push_str(end_tag);
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

fn local_name(qualified_name: &str) -> &str {
    qualified_name
        .rsplit_once(':')
        .map_or(qualified_name, |(_, local)| local)
}

/// Whether every character of `text` is allowed in an XML 1.0 document.
///
/// Escaping cannot help with characters outside the `Char` production
/// (most C0 controls, `U+FFFE`, `U+FFFF`), so callers must reject them.
pub fn is_xml_text(text: &str) -> bool {
    text.chars().all(|c| {
        matches!(c, '\t' | '\n' | '\r')
            || ('\u{20}'..='\u{D7FF}').contains(&c)
            || ('\u{E000}'..='\u{FFFD}').contains(&c)
            || c >= '\u{10000}'
    })
}

/// Escape character data for use as element content.
///
/// `\r` becomes a character reference, since parsers fold a literal CR into `\n`.
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '\r']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
