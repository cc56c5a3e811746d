//! Namespace-aware element tree built on `quick-xml`.
//!
//! Appcast feeds are small, so the whole document is materialized into an
//! [`Element`] tree before any interpretation happens. Element and attribute
//! names are resolved against `xmlns` declarations in scope:
//!
//! - a prefixed name takes the namespace bound to its prefix (an unbound prefix is
//!   a document error),
//! - an unprefixed element takes the default namespace in scope, if any,
//! - an unprefixed attribute has no namespace.
//!
//! The byte order mark or the `encoding` declaration selects the character
//! encoding, UTF-8 by default.
//!
//! Any markup error (mismatched tags, unbound prefixes, unknown entities,
//! unterminated document) becomes [`UpdateError::FeedFormat`].

use crate::core::{Result, UpdateError};
use quick_xml::NsReader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

/// A resolved `{namespace}local` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    /// Namespace URI, `None` for names outside any namespace
    pub namespace: Option<String>,
    /// Local part of the name
    pub local: String,
}

impl QName {
    fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.local == local && self.namespace.as_deref() == namespace
    }
}

/// One element of the parsed document.
#[derive(Debug, Clone)]
pub struct Element {
    /// Resolved element name
    pub name: QName,
    /// Attributes in document order, `xmlns` declarations excluded
    pub attributes: Vec<(QName, String)>,
    /// Child elements in document order
    pub children: Vec<Element>,
    /// Character data directly inside this element (not inside children)
    pub text: String,
}

impl Element {
    /// Value of the attribute `{namespace}local`.
    #[must_use]
    pub fn attr(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name.matches(namespace, local))
            .map(|(_, value)| value.as_str())
    }

    /// First direct child named `{namespace}local`.
    #[must_use]
    pub fn child(&self, namespace: Option<&str>, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name.matches(namespace, local))
    }

    /// All direct children named `{namespace}local`.
    pub fn children_named<'a>(
        &'a self,
        namespace: Option<&'a str>,
        local: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name.matches(namespace, local))
    }

    /// Text of the first direct child named `{namespace}local`.
    #[must_use]
    pub fn child_text(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.child(namespace, local).map(|c| c.text.as_str())
    }

    /// This element and every descendant named `{namespace}local`, depth first
    /// in document order.
    #[must_use]
    pub fn descendants_named<'a>(&'a self, namespace: Option<&str>, local: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_named(namespace, local, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, namespace: Option<&str>, local: &str, found: &mut Vec<&'a Element>) {
        if self.name.matches(namespace, local) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_named(namespace, local, found);
        }
    }
}

/// Parse a complete document into its root element.
///
/// The document is decoded according to its byte order mark or `encoding`
/// declaration, defaulting to UTF-8.
pub fn parse_document(document: &[u8]) -> Result<Element> {
    let mut reader = NsReader::from_reader(document);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            UpdateError::feed_format(format!("at byte {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(ref e) => {
                let element = open_element(&reader, e)?;
                if open.is_empty() && root.is_some() {
                    return Err(UpdateError::feed_format("multiple root elements"));
                }
                open.push(element);
            }
            Event::Empty(ref e) => {
                let element = open_element(&reader, e)?;
                attach(element, &mut open, &mut root)?;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| UpdateError::feed_format("unexpected closing tag"))?;
                attach(element, &mut open, &mut root)?;
            }
            Event::Text(ref e) => {
                let content = e.decode().map_err(UpdateError::feed_format)?;
                push_text(&mut open, &content)?;
            }
            Event::CData(ref e) => {
                let content = e.decode().map_err(UpdateError::feed_format)?;
                push_text(&mut open, &content)?;
            }
            Event::GeneralRef(ref e) => {
                let resolved = match e.resolve_char_ref().map_err(UpdateError::feed_format)? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = e.decode().map_err(UpdateError::feed_format)?;
                        quick_xml::escape::resolve_predefined_entity(&name)
                            .ok_or_else(|| UpdateError::feed_format(format!("undefined entity '&{name};'")))?
                            .to_string()
                    }
                };
                push_text(&mut open, &resolved)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(UpdateError::feed_format("unexpected end of document"));
    }
    root.ok_or_else(|| UpdateError::feed_format("document has no root element"))
}

fn qualified_name(decoder: Decoder, resolved: ResolveResult<'_>, local: &[u8]) -> Result<QName> {
    let namespace = match resolved {
        ResolveResult::Unbound => None,
        ResolveResult::Bound(ns) if ns.as_ref().is_empty() => None,
        ResolveResult::Bound(ns) => Some(decoder.decode(ns.as_ref()).map_err(UpdateError::feed_format)?.into_owned()),
        ResolveResult::Unknown(prefix) => {
            return Err(UpdateError::feed_format(format!(
                "unbound namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };
    Ok(QName {
        namespace,
        local: decoder.decode(local).map_err(UpdateError::feed_format)?.into_owned(),
    })
}

fn open_element(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> Result<Element> {
    let decoder = reader.decoder();
    let resolver = reader.resolver();

    let (resolved, local) = resolver.resolve_element(start.name());
    let name = qualified_name(decoder, resolved, local.as_ref())?;

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(UpdateError::feed_format)?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = resolver.resolve_attribute(attribute.key);
        let key = qualified_name(decoder, resolved, local.as_ref())?;
        let value = attribute
            .decode_and_unescape_value(decoder)
            .map_err(UpdateError::feed_format)?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(element: Element, open: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(UpdateError::feed_format("multiple root elements")),
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(open: &mut [Element], content: &str) -> Result<()> {
    match open.last_mut() {
        Some(current) => current.text.push_str(content),
        None if !content.trim().is_empty() => {
            return Err(UpdateError::feed_format("text outside the root element"));
        }
        None => {}
    }
    Ok(())
}
