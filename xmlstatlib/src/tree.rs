//! Tree source abstraction.
//!
//! The aggregator only needs a small view of a document: each node's kind,
//! name, text, ordered children and attributes. [`TreeNode`] captures that
//! view so any ordered tree of named nodes can be aggregated. An
//! implementation for [`roxmltree::Node`] is provided.

use std::borrow::Cow;

/// The kind of a node in the tree source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A named element
    Element,
    /// Character data (text or CDATA)
    Text,
    /// Anything else: comments, processing instructions, the document node
    Other,
}

/// A node in an ordered tree of named nodes.
pub trait TreeNode: Sized {
    /// What kind of node this is.
    fn kind(&self) -> NodeKind;

    /// The node's name as written in the document. Empty for text nodes.
    fn name(&self) -> Cow<'_, str>;

    /// Character data carried directly by this node (text nodes only).
    fn text(&self) -> Option<Cow<'_, str>>;

    /// Children in document order.
    fn children(&self) -> Vec<Self>;

    /// Attribute name/value pairs in document order.
    fn attributes(&self) -> Vec<(Cow<'_, str>, Cow<'_, str>)>;
}

impl<'a, 'input: 'a> TreeNode for roxmltree::Node<'a, 'input> {
    fn kind(&self) -> NodeKind {
        if self.is_element() {
            NodeKind::Element
        } else if self.is_text() {
            NodeKind::Text
        } else {
            NodeKind::Other
        }
    }

    fn name(&self) -> Cow<'_, str> {
        if !self.is_element() {
            return Cow::Borrowed("");
        }
        let input = self.document().input_text();
        let name = input
            .get(self.range())
            .and_then(|source| source.strip_prefix('<'))
            .and_then(|source| qualified_name(source, &['/', '>']))
            .unwrap_or_else(|| self.tag_name().name());
        Cow::Borrowed(name)
    }

    fn text(&self) -> Option<Cow<'_, str>> {
        if self.is_text() {
            roxmltree::Node::text(self).map(Cow::Borrowed)
        } else {
            None
        }
    }

    fn children(&self) -> Vec<Self> {
        roxmltree::Node::children(self).collect()
    }

    fn attributes(&self) -> Vec<(Cow<'_, str>, Cow<'_, str>)> {
        let input = self.document().input_text();
        roxmltree::Node::attributes(self)
            .map(|attr| {
                let name = input
                    .get(attr.range())
                    .and_then(|source| qualified_name(source.trim_start(), &['=']))
                    .unwrap_or_else(|| attr.name());
                (Cow::Borrowed(name), Cow::Borrowed(attr.value()))
            })
            .collect()
    }
}

/// Leading qualified name of `source`, as written: everything up to the
/// first whitespace or one of `stops`.
fn qualified_name<'i>(source: &'i str, stops: &[char]) -> Option<&'i str> {
    let end = source
        .find(|c: char| c.is_whitespace() || stops.contains(&c))
        .unwrap_or(source.len());
    Some(&source[..end]).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roxmltree_kinds() {
        let doc = roxmltree::Document::parse("<a>hi<!-- note --><b/></a>").unwrap();
        let root = doc.root_element();
        let kinds: Vec<NodeKind> = TreeNode::children(&root)
            .iter()
            .map(TreeNode::kind)
            .collect();
        assert_eq!(kinds, vec![NodeKind::Text, NodeKind::Other, NodeKind::Element]);
    }

    #[test]
    fn test_roxmltree_prefixed_name() {
        let doc =
            roxmltree::Document::parse(r#"<x:a xmlns:x="urn:x"><x:b/><c/></x:a>"#).unwrap();
        let root = doc.root_element();
        assert_eq!(TreeNode::name(&root), "x:a");
        let names: Vec<String> = TreeNode::children(&root)
            .iter()
            .map(|c| TreeNode::name(c).into_owned())
            .collect();
        assert_eq!(names, vec!["x:b", "c"]);
    }

    #[test]
    fn test_prefixes_sharing_a_namespace_stay_distinct() {
        let doc = roxmltree::Document::parse(
            r#"<root xmlns:p="urn:a" xmlns:q="urn:a"><p:x/><q:x p:k="1" q:j="2"/></root>"#,
        )
        .unwrap();
        let root = doc.root_element();
        let children = TreeNode::children(&root);
        let names: Vec<String> = children
            .iter()
            .map(|c| TreeNode::name(c).into_owned())
            .collect();
        assert_eq!(names, vec!["p:x", "q:x"]);

        let attrs: Vec<String> = TreeNode::attributes(&children[1])
            .into_iter()
            .map(|(name, _)| name.into_owned())
            .collect();
        assert_eq!(attrs, vec!["p:k", "q:j"]);
    }

    #[test]
    fn test_prefix_kept_when_default_namespace_matches() {
        let doc = roxmltree::Document::parse(
            r#"<root xmlns="urn:a" xmlns:p="urn:a"><item/><p:other/></root>"#,
        )
        .unwrap();
        let root = doc.root_element();
        let names: Vec<String> = TreeNode::children(&root)
            .iter()
            .map(|c| TreeNode::name(c).into_owned())
            .collect();
        assert_eq!(names, vec!["item", "p:other"]);
    }

    #[test]
    fn test_name_with_whitespace_before_close() {
        let doc = roxmltree::Document::parse("<a\n  ><b\t/></a >").unwrap();
        let root = doc.root_element();
        assert_eq!(TreeNode::name(&root), "a");
        let children = TreeNode::children(&root);
        assert_eq!(TreeNode::name(&children[0]), "b");
    }

    #[test]
    fn test_attribute_name_with_spaces_around_equals() {
        let doc = roxmltree::Document::parse("<a  id = '7'/>").unwrap();
        let root = doc.root_element();
        let attrs = TreeNode::attributes(&root);
        assert_eq!(attrs[0].0, "id");
        assert_eq!(attrs[0].1, "7");
    }

    #[test]
    fn test_roxmltree_attributes_in_order() {
        let doc = roxmltree::Document::parse(r#"<a id="7" kind="x"/>"#).unwrap();
        let root = doc.root_element();
        let attrs = TreeNode::attributes(&root);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].0, "id");
        assert_eq!(attrs[0].1, "7");
        assert_eq!(attrs[1].0, "kind");
    }

    #[test]
    fn test_text_only_on_text_nodes() {
        let doc = roxmltree::Document::parse("<a>hi</a>").unwrap();
        let root = doc.root_element();
        assert!(TreeNode::text(&root).is_none());
        let children = TreeNode::children(&root);
        assert_eq!(TreeNode::text(&children[0]).as_deref(), Some("hi"));
    }
}
