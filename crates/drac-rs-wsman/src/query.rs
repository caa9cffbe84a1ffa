// crates/drac-rs-wsman/src/query.rs

//! Namespaced element lookup over a parsed [`Document`].

use crate::document::{Document, Element};
use crate::log::{LogMetadata, wsman_trace};
use std::fmt;

/// Namespace of the XMLSchema-instance attributes (`xsi:nil`, `xsi:type`).
pub const NS_XML_SCHEMA_INSTANCE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// A field of a WSMAN resource: the resource URI (used as XML namespace)
/// and the element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub resource_uri: &'a str,
    pub name: &'a str,
}

impl<'a> Field<'a> {
    pub fn new(resource_uri: &'a str, name: &'a str) -> Self {
        Self { resource_uri, name }
    }

    pub fn query(&self) -> ElementQuery<'a> {
        ElementQuery::new(self.resource_uri, self.name)
    }
}

impl LogMetadata for Field<'_> {
    fn meta(&self) -> String {
        format!("resource={}, field={}", self.resource_uri, self.name)
    }
}

/// "Any descendant named `tag` in `namespace`", rendered as `.//{namespace}tag`.
///
/// Inputs are not validated: a namespace or tag that cannot occur in a
/// document simply never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementQuery<'a> {
    pub namespace: &'a str,
    pub tag: &'a str,
}

impl<'a> ElementQuery<'a> {
    pub fn new(namespace: &'a str, tag: &'a str) -> Self {
        Self { namespace, tag }
    }

    pub fn matches(&self, element: &Element) -> bool {
        element.name.is(self.namespace, self.tag)
    }

    /// First matching descendant of the document root, in document order.
    pub fn first<'d>(&self, doc: &'d Document) -> Option<&'d Element> {
        doc.descendants().find(|e| self.matches(e))
    }

    /// All matching descendants of the document root, in document order.
    pub fn all<'d>(&self, doc: &'d Document) -> Vec<&'d Element> {
        doc.descendants().filter(|e| self.matches(e)).collect()
    }
}

impl fmt::Display for ElementQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".//{{{}}}{}", self.namespace, self.tag)
    }
}

/// Finds the first element named `item` in `namespace`, or `None`.
pub fn find_xml<'d>(doc: &'d Document, item: &str, namespace: &str) -> Option<&'d Element> {
    let found = ElementQuery::new(namespace, item).first(doc);
    wsman_trace!(
        Field::new(namespace, item),
        "First-match lookup found={}",
        found.is_some()
    );
    found
}

/// Finds every element named `item` in `namespace`. Empty when nothing matches.
pub fn find_all_xml<'d>(doc: &'d Document, item: &str, namespace: &str) -> Vec<&'d Element> {
    let found = ElementQuery::new(namespace, item).all(doc);
    wsman_trace!(
        Field::new(namespace, item),
        "All-match lookup found {} element(s)",
        found.len()
    );
    found
}

/// Returns `false` only when the element carries `xsi:nil="true"`.
pub fn is_non_nil(element: &Element) -> bool {
    element.attribute(Some(NS_XML_SCHEMA_INSTANCE), "nil") != Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS_A: &str = "http://schemas.dell.com/wbem/wscim/1/cim-schema/2/DCIM_RAIDService";
    const NS_B: &str = "http://schemas.dell.com/wbem/wscim/1/cim-schema/2/DCIM_BIOSService";

    fn sample() -> Document {
        let xml = format!(
            r#"<Envelope xmlns:a="{NS_A}" xmlns:b="{NS_B}" xmlns:xsi="{NS_XML_SCHEMA_INSTANCE}">
                 <a:Item>first</a:Item>
                 <b:Item>other namespace</b:Item>
                 <wrapper><a:Item xsi:nil="true"/></wrapper>
                 <a:Item xsi:nil="TRUE">third</a:Item>
               </Envelope>"#
        );
        Document::parse(&xml).unwrap()
    }

    #[test]
    fn test_query_display() {
        let query = ElementQuery::new(NS_A, "Item");
        assert_eq!(query.to_string(), format!(".//{{{NS_A}}}Item"));
        assert_eq!(Field::new(NS_A, "Item").query(), query);
    }

    #[test]
    fn test_find_first_respects_namespace() {
        let doc = sample();
        let item = find_xml(&doc, "Item", NS_B).unwrap();
        assert_eq!(item.text.as_deref(), Some("other namespace"));
        assert!(find_xml(&doc, "Item", "urn:nowhere").is_none());
        assert!(find_xml(&doc, "", NS_A).is_none());
    }

    #[test]
    fn test_find_all_is_in_document_order() {
        let doc = sample();
        let items = find_all_xml(&doc, "Item", NS_A);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text.as_deref(), Some("first"));
        assert_eq!(items[1].text, None);
        assert_eq!(items[2].text.as_deref(), Some("third"));
        assert!(find_all_xml(&doc, "Missing", NS_A).is_empty());
    }

    #[test]
    fn test_root_is_not_a_candidate() {
        let doc = Document::parse(&format!(r#"<a:Item xmlns:a="{NS_A}">x</a:Item>"#)).unwrap();
        assert!(find_xml(&doc, "Item", NS_A).is_none());
    }

    #[test]
    fn test_nil_check_is_case_sensitive() {
        let doc = sample();
        let items = find_all_xml(&doc, "Item", NS_A);
        assert!(is_non_nil(items[0]));
        assert!(!is_non_nil(items[1]));
        assert!(is_non_nil(items[2]));
    }

    #[test]
    fn test_nil_attribute_needs_schema_instance_namespace() {
        let doc =
            Document::parse(&format!(r#"<r xmlns:a="{NS_A}"><a:Item nil="true"/></r>"#)).unwrap();
        let item = find_xml(&doc, "Item", NS_A).unwrap();
        assert!(is_non_nil(item));
    }
}
