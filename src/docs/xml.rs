//! Minimal owned XML tree for Doxygen output.
//!
//! Doxygen documents are small enough to hold in memory, and the reducer needs
//! mixed content (text interleaved with elements) in document order, so every
//! file is parsed into a [`ContentNode`] tree up front. Lookups never fail:
//! a missing child is simply `None` or an empty iterator.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Errors produced while building a [`ContentNode`] tree.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error(transparent)]
    Syntax(#[from] quick_xml::Error),

    #[error("unexpected closing tag </{0}>")]
    UnexpectedEnd(String),

    #[error("unclosed element <{0}>")]
    Unclosed(String),

    #[error("document has no root element")]
    Empty,

    #[error("expected root <{expected}> but found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("missing <{0}> element")]
    MissingElement(String),
}

/// A child of an element: either raw character data or a nested element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(ContentNode),
}

/// One element with its attributes and children in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl ContentNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Parse a complete document and return its root element.
    pub fn parse_str(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<ContentNode> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(element_from(&start)?),
                Event::Empty(start) => {
                    let element = element_from(&start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| {
                        XmlError::UnexpectedEnd(String::from_utf8_lossy(end.name().as_ref()).into())
                    })?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let decoded = text
                            .unescape()
                            .map(|t| t.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                        parent.push_text(decoded);
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(String::from_utf8_lossy(&data.into_inner()).into_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.tag));
        }
        root.ok_or(XmlError::Empty)
    }

    /// Parse a document and require a specific root tag.
    pub fn parse_rooted(xml: &str, expected: &str) -> Result<Self, XmlError> {
        let root = Self::parse_str(xml)?;
        if root.tag != expected {
            return Err(XmlError::UnexpectedRoot {
                expected: expected.to_string(),
                found: root.tag,
            });
        }
        Ok(root)
    }

    fn push_text(&mut self, text: String) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &ContentNode> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// All child elements with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ContentNode> {
        self.elements().filter(move |element| element.tag == tag)
    }

    pub fn first_child(&self, tag: &str) -> Option<&ContentNode> {
        self.elements().find(|element| element.tag == tag)
    }

    /// Direct character data of this element (the element's own PCDATA).
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Character data of this element and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Direct text of the first child with the given tag, empty when absent.
    pub fn child_text(&self, tag: &str) -> String {
        self.first_child(tag).map(ContentNode::text).unwrap_or_default()
    }
}

fn collect_text(node: &ContentNode, out: &mut String) {
    for child in &node.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(element, out),
        }
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<ContentNode, XmlError> {
    let mut element = ContentNode::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [ContentNode], root: &mut Option<ContentNode>, element: ContentNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => {
            // Anything after the first root element is ignored.
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_content() {
        let root = ContentNode::parse_str(
            r#"<?xml version='1.0' encoding='UTF-8'?>
<para kind="x">Use <ref refid="a">wxString</ref> &amp; friends.</para>"#,
        )
        .unwrap();

        assert_eq!(root.tag, "para");
        assert_eq!(root.attr("kind"), Some("x"));
        assert_eq!(root.attr("missing"), None);
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.text(), "Use  & friends.");
        assert_eq!(root.text_content(), "Use wxString & friends.");
        assert_eq!(root.first_child("ref").unwrap().text(), "wxString");
    }

    #[test]
    fn test_empty_elements_and_lookup() {
        let root = ContentNode::parse_str(
            "<compound><member kind=\"function\"/><name>A</name><member kind=\"variable\"/></compound>",
        )
        .unwrap();

        assert_eq!(root.children_named("member").count(), 2);
        assert_eq!(root.child_text("name"), "A");
        assert_eq!(root.child_text("missing"), "");
        assert!(root.first_child("missing").is_none());
    }

    #[test]
    fn test_unescapes_entities_in_text_and_attributes() {
        let root =
            ContentNode::parse_str("<name title=\"a &lt;b&gt;\">wxArray&lt; T &gt;</name>").unwrap();
        assert_eq!(root.text(), "wxArray< T >");
        assert_eq!(root.attr("title"), Some("a <b>"));
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(ContentNode::parse_str("<a><b></a>").is_err());
        assert!(ContentNode::parse_str("<a><b>").is_err());
        assert!(matches!(ContentNode::parse_str("   "), Err(XmlError::Empty)));
    }

    #[test]
    fn test_parse_rooted_checks_tag() {
        assert!(ContentNode::parse_rooted("<doxygen/>", "doxygen").is_ok());
        let err = ContentNode::parse_rooted("<other/>", "doxygen").unwrap_err();
        assert!(matches!(err, XmlError::UnexpectedRoot { .. }));
    }
}
