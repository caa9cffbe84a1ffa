// crates/drac-rs-wsman/src/document.rs

//! Read-only element tree for WSMAN response documents.
//!
//! The tree is materialized once by [`Document::parse`] and never mutated
//! afterwards. Every element keeps its namespace-qualified name, the text that
//! precedes its first child, and its namespace-qualified attributes.

use crate::error::WsmanError;
use quick_xml::escape::{EscapeError, resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::collections::BTreeMap;
use std::fmt;

/// A namespace-qualified XML name (`{namespace}local`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifiedName {
    /// Namespace URI, `None` for names outside any namespace.
    pub namespace: Option<String>,
    /// Local part of the name, without prefix.
    pub local: String,
}

impl QualifiedName {
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.to_string(),
        }
    }

    /// Returns `true` if this name has exactly the given namespace and local part.
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local == local
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// A single element of a parsed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QualifiedName,
    /// Character data before the first child element. `None` when there is none.
    pub text: Option<String>,
    pub attributes: BTreeMap<QualifiedName, String>,
    pub children: Vec<Element>,
}

impl Element {
    fn new(name: QualifiedName) -> Self {
        Self {
            name,
            text: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Looks up an attribute by namespace and local name.
    pub fn attribute(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.namespace.as_deref() == namespace && key.local == local)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over all elements below this one in document order.
    /// The element itself is not included.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Deepest element nesting accepted by [`Document::parse`].
pub const MAX_DEPTH: usize = 256;

/// An element whose end tag has not been read yet.
struct OpenElement {
    element: Element,
    // Set by the first child, comment or PI. Later text is someone's tail.
    text_done: bool,
}

impl OpenElement {
    fn new(element: Element) -> Self {
        Self {
            element,
            text_done: false,
        }
    }

    fn push_text(&mut self, fragment: &str) {
        if self.text_done {
            return;
        }
        self.element
            .text
            .get_or_insert_with(String::new)
            .push_str(fragment);
    }
}

/// Pre-order iterator over the descendants of an [`Element`].
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// A parsed, immutable WSMAN response document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parses a response body into a document tree.
    ///
    /// Only well-formedness and namespace prefixes are checked; no schema
    /// validation is performed. Comments, processing instructions and the
    /// XML declaration are skipped, but a comment or PI ends the text of the
    /// element it appears in.
    ///
    /// # Errors
    /// Returns `WsmanError::XmlParsing` for malformed XML,
    /// `WsmanError::MalformedDocument` when the element structure is incomplete,
    /// nested deeper than [`MAX_DEPTH`] or surrounded by text, and
    /// `WsmanError::UnknownPrefix` for undeclared namespace prefixes.
    pub fn parse(xml_content: &str) -> Result<Document, WsmanError> {
        let mut reader = NsReader::from_str(xml_content);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<OpenElement> = Vec::new();
        let mut root: Option<Element> = None;
        let mut count = 0usize;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(malformed("element nesting too deep"));
                    }
                    stack.push(OpenElement::new(open_element(&reader, &start)?));
                    count += 1;
                }
                Event::Empty(start) => {
                    let element = open_element(&reader, &start)?;
                    count += 1;
                    close_element(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let open = stack
                        .pop()
                        .ok_or_else(|| malformed("unexpected closing tag"))?;
                    close_element(&mut stack, &mut root, open.element)?;
                }
                Event::Text(text) => {
                    let decoded = text.decode()?;
                    match stack.last_mut() {
                        Some(current) => current.push_text(&unescape(&decoded)?),
                        None if decoded.trim().is_empty() => {}
                        None => return Err(malformed("text outside the root element")),
                    }
                }
                Event::CData(cdata) => {
                    let current = stack
                        .last_mut()
                        .ok_or_else(|| malformed("text outside the root element"))?;
                    current.push_text(&cdata.decode()?);
                }
                Event::GeneralRef(reference) => {
                    let current = stack
                        .last_mut()
                        .ok_or_else(|| malformed("text outside the root element"))?;
                    let resolved = match reference.resolve_char_ref()? {
                        Some(ch) => ch.to_string(),
                        None => {
                            let name = reference.decode()?;
                            resolve_predefined_entity(&name)
                                .ok_or_else(|| {
                                    EscapeError::UnrecognizedEntity(
                                        0..name.len(),
                                        name.to_string(),
                                    )
                                })?
                                .to_string()
                        }
                    };
                    current.push_text(&resolved);
                }
                Event::Comment(_) | Event::PI(_) => {
                    if let Some(current) = stack.last_mut() {
                        current.text_done = true;
                    }
                }
                Event::Eof => break,
                // The XML declaration and DOCTYPE carry no field data.
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(malformed("unclosed element at end of document"));
        }
        let root = root.ok_or_else(|| malformed("document has no root element"))?;
        log::trace!("Parsed WSMAN document with {} elements", count);

        Ok(Document { root })
    }

    /// Wraps an already-built element tree.
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Iterates over every element below the root, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        self.root.descendants()
    }
}

/// Builds an element (name and attributes) from a start tag, resolving prefixes
/// against the namespace bindings currently in scope.
fn open_element(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, WsmanError> {
    let (ns, local) = reader.resolve_element(start.name());
    let name = qualified_name(ns, local.into_inner())?;
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr?;
        // `xmlns` and `xmlns:p` are bindings, not data.
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (ns, local) = reader.resolve_attribute(attr.key);
        let key = qualified_name(ns, local.into_inner())?;
        let value = attr.decode_and_unescape_value(reader.decoder())?;
        element.attributes.insert(key, value.into_owned());
    }

    Ok(element)
}

fn qualified_name(ns: ResolveResult<'_>, local: &[u8]) -> Result<QualifiedName, WsmanError> {
    let local = String::from_utf8_lossy(local).into_owned();
    match ns {
        ResolveResult::Bound(namespace) => Ok(QualifiedName {
            namespace: Some(String::from_utf8_lossy(namespace.into_inner()).into_owned()),
            local,
        }),
        ResolveResult::Unbound => Ok(QualifiedName {
            namespace: None,
            local,
        }),
        ResolveResult::Unknown(prefix) => Err(WsmanError::UnknownPrefix {
            prefix: String::from_utf8_lossy(&prefix).into_owned(),
        }),
    }
}

/// Attaches a finished element to its parent, or makes it the root.
fn close_element(
    stack: &mut [OpenElement],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), WsmanError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.element.children.push(element);
            parent.text_done = true;
        }
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed("multiple root elements")),
    }
    Ok(())
}

fn malformed(reason: &'static str) -> WsmanError {
    WsmanError::MalformedDocument { reason }
}
