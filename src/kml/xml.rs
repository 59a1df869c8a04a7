//! Minimal XML element tree built on `quick-xml`.
//!
//! Only what geometry extraction needs is kept: local element names, text
//! content and children. Namespace prefixes are stripped, so `kml:Placemark`
//! and `Placemark` are the same element.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ImportError, Result};

/// A parsed XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    /// Local name of the element, without namespace prefix.
    pub name: String,
    /// Text and CDATA content directly inside this element. Separate chunks
    /// are joined with a space.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Self {
        Self::new(String::from_utf8_lossy(start.local_name().as_ref()))
    }

    fn push_text(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(value);
    }

    /// This element and all its descendants named `name`, in document order.
    pub fn elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        PreOrder { stack: vec![self] }.filter(move |node| node.name == name)
    }

    /// Descendants named `name` that have no ancestor of the same name below
    /// `self`, in document order.
    pub fn outermost(&self, name: &str) -> Vec<&XmlNode> {
        let mut found = Vec::new();
        let mut stack: Vec<&XmlNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.name == name {
                found.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        found
    }

    /// Descendant selection, like the CSS selector `a b c`: every descendant
    /// matching the last name whose ancestors below `self` match the earlier
    /// names in order. Results are in document order.
    pub fn select(&self, path: &[&str]) -> Vec<&XmlNode> {
        let mut found = Vec::new();
        if path.is_empty() {
            return found;
        }

        let mut stack: Vec<(&XmlNode, usize)> =
            self.children.iter().rev().map(|child| (child, 0)).collect();
        while let Some((node, matched)) = stack.pop() {
            let matched = if node.name == path[matched] {
                matched + 1
            } else {
                matched
            };
            if matched == path.len() {
                found.push(node);
                continue;
            }
            stack.extend(node.children.iter().rev().map(|child| (child, matched)));
        }
        found
    }

    /// First match of [`XmlNode::select`].
    pub fn select_first(&self, path: &[&str]) -> Option<&XmlNode> {
        self.select(path).into_iter().next()
    }
}

struct PreOrder<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Parses an XML document into its root element.
///
/// Syntax errors, mismatched or unclosed tags, documents without a root and
/// content after the root all fail with [`ImportError::MalformedDocument`].
pub fn parse(text: &str) -> Result<XmlNode> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| malformed(format!("XML error at position {}: {}", position, e)))?;

        match event {
            Event::Start(start) => {
                ensure_single_root(&stack, &root)?;
                stack.push(XmlNode::from_start(&start));
            }
            Event::Empty(start) => {
                ensure_single_root(&stack, &root)?;
                attach(&mut stack, &mut root, XmlNode::from_start(&start));
            }
            Event::End(end) => {
                let node = stack.pop().ok_or_else(|| {
                    malformed(format!(
                        "unexpected closing tag '</{}>'",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, node);
            }
            Event::Text(value) => {
                let value = value
                    .unescape()
                    .map_err(|e| malformed(format!("invalid text content: {}", e)))?;
                push_content(&mut stack, &value)?;
            }
            Event::CData(value) => {
                let value = String::from_utf8_lossy(&value).into_owned();
                push_content(&mut stack, &value)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!(
            "unexpected end of document inside '<{}>'",
            open.name
        )));
    }

    root.ok_or_else(|| malformed("document has no root element".to_string()))
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn ensure_single_root(stack: &[XmlNode], root: &Option<XmlNode>) -> Result<()> {
    if stack.is_empty() && root.is_some() {
        return Err(malformed("more than one root element".to_string()));
    }
    Ok(())
}

fn push_content(stack: &mut [XmlNode], value: &str) -> Result<()> {
    match stack.last_mut() {
        Some(node) => {
            node.push_text(value);
            Ok(())
        }
        None if value.trim().is_empty() => Ok(()),
        None => Err(malformed("text outside the root element".to_string())),
    }
}

fn malformed(message: String) -> ImportError {
    ImportError::MalformedDocument(message)
}
