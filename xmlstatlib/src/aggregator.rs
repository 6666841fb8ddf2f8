//! Tree walk that fills a [`StatsRegistry`].
//!
//! The walk is a pre-order traversal (parent before children, children left
//! to right) driven by an explicit work stack, so deeply nested documents do
//! not grow the call stack. Traversal order decides first-seen order, which
//! is the order tags and values are displayed in.
//!
//! Per element node:
//!
//! 1. The element's name is counted as a tag.
//! 2. With attribute aggregation enabled, each attribute is counted as a
//!    synthetic `element.attribute` tag carrying the attribute value.
//! 3. If the element is a *value node* (its only child is non-blank text),
//!    the text is counted as a value of the tag.
//! 4. Children are queued in document order.
//!
//! Text nodes are skipped; their parent represents them. Comments and
//! processing instructions are not counted but their children, if any, are
//! still walked.

use log::{debug, trace};

use crate::error::XmlstatError;
use crate::options::AnalyzeOptions;
use crate::stats::StatsRegistry;
use crate::tree::{NodeKind, TreeNode};
use crate::Result;

/// Walks a tree once, updating a registry per node.
pub struct Aggregator<'r> {
    registry: &'r mut StatsRegistry,
    options: AnalyzeOptions,
    elements: usize,
}

impl<'r> Aggregator<'r> {
    /// Create an aggregator writing into `registry`.
    pub fn new(registry: &'r mut StatsRegistry, options: AnalyzeOptions) -> Self {
        Self {
            registry,
            options,
            elements: 0,
        }
    }

    /// Walk the tree under `root`, returning the number of elements visited.
    ///
    /// Fails with [`XmlstatError::MissingRoot`] when there is no root.
    pub fn walk<N: TreeNode>(mut self, root: Option<N>) -> Result<usize> {
        let root = root.ok_or(XmlstatError::MissingRoot)?;
        debug!("aggregating tree (attributes: {})", self.options.attributes);

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let children = node.children();
            match node.kind() {
                NodeKind::Element => self.visit_element(&node, &children),
                NodeKind::Text => {
                    trace!("skipping text node");
                    continue;
                }
                NodeKind::Other => trace!("skipping non-element node"),
            }
            stack.extend(children.into_iter().rev());
        }

        debug!(
            "aggregated {} elements into {} tags, {} ranges",
            self.elements,
            self.registry.len(),
            self.registry.ranges().len()
        );
        Ok(self.elements)
    }

    fn visit_element<N: TreeNode>(&mut self, node: &N, children: &[N]) {
        self.elements += 1;
        let name = node.name();
        let tag = self.registry.upsert_tag(&name);

        if self.options.attributes {
            for (attr_name, attr_value) in node.attributes() {
                let attr_tag = self
                    .registry
                    .upsert_tag(&format!("{}.{}", name.trim(), attr_name));
                self.registry.upsert_value(attr_tag, &attr_value);
            }
        }

        if let Some(text) = value_text(children) {
            self.registry.upsert_value(tag, &text);
        }
    }
}

/// Aggregate the tree under `root` into `registry`.
///
/// The registry is not cleared first; call [`StatsRegistry::clear`] between
/// independent runs.
pub fn aggregate<N: TreeNode>(
    root: Option<N>,
    registry: &mut StatsRegistry,
    options: AnalyzeOptions,
) -> Result<usize> {
    Aggregator::new(registry, options).walk(root)
}

/// Text of a value node: exactly one child, which is non-blank text.
fn value_text<N: TreeNode>(children: &[N]) -> Option<String> {
    match children {
        [only] if only.kind() == NodeKind::Text => only
            .text()
            .filter(|text| !text.trim().is_empty())
            .map(|text| text.into_owned()),
        _ => None,
    }
}
