//! Owned element tree built from `quick-xml` resolved events.

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use tracing::trace;

use crate::error::XmlError;

/// An XML element with its resolved namespace, attributes, text, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Local name without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved namespace URI, if the element is bound to one.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Concatenated character data directly inside this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    /// Whether this element is `{ns}name`.
    pub fn is(&self, ns: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(ns)
    }

    /// First direct child named `{ns}name`.
    pub fn child(&self, ns: &str, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(ns, name))
    }

    /// All direct children named `{ns}name`, in document order.
    pub fn children_named<'a, 'n>(
        &'a self,
        ns: &'n str,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Element> + 'n
    where
        'a: 'n,
    {
        self.children.iter().filter(move |c| c.is(ns, name))
    }

    /// First element reached by following `path` through direct children.
    ///
    /// Every branch is explored in document order, so `prod/xProd` finds the
    /// first `xProd` under any `prod`, not only under the first one.
    pub fn find(&self, ns: &str, path: &[&str]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .children
                .iter()
                .filter(|c| c.is(ns, head))
                .find_map(|child| child.find(ns, rest)),
        }
    }

    /// First match of `path` anchored at any descendant, searched depth-first
    /// in document order. This element itself is never an anchor.
    pub fn find_descendant(&self, ns: &str, path: &[&str]) -> Option<&Element> {
        let (head, rest) = path.split_first()?;
        self.children.iter().find_map(|child| {
            if child.is(ns, head) {
                if let Some(found) = child.find(ns, rest) {
                    return Some(found);
                }
            }
            child.find_descendant(ns, path)
        })
    }
}

/// Parse raw bytes, which must be UTF-8 (a leading BOM is allowed).
pub fn parse_bytes(bytes: &[u8]) -> Result<Element, XmlError> {
    parse(std::str::from_utf8(bytes)?)
}

/// Parse a document into its root element.
pub fn parse(text: &str) -> Result<Element, XmlError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = NsReader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) => {
                stack.push(open_element(ns, &e)?);
            }
            Ok((ns, Event::Empty(e))) => {
                let element = open_element(ns, &e)?;
                close_element(&mut stack, &mut root, element);
            }
            Ok((_, Event::End(_))) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unexpected closing tag".to_string()))?;
                close_element(&mut stack, &mut root, element);
            }
            Ok((_, Event::Text(e))) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| XmlError::Malformed(err.to_string()))?;
                    current.text.push_str(&text);
                }
            }
            Ok((_, Event::CData(e))) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(XmlError::Malformed(format!(
                    "at byte {}: {err}",
                    reader.buffer_position()
                )));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or(XmlError::NoRoot)
}

fn open_element(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let namespace = match ns {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    };

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| XmlError::Malformed(err.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Malformed(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        namespace,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn close_element(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => trace!(name = %element.name, "ignoring element after document root"),
    }
}
