//! Incremental element tree for the FMPXMLRESULT grammar.
//!
//! [`TreeBuilder`] receives start/text/end events in document order and keeps
//! an owned stack of open [`ElementNode`]s. A node is pushed when its start tag
//! arrives and, when it closes, is either routed (header elements and rows) or
//! attached to its parent. Rows are handed to the [`RowImporter`] and dropped
//! straight away, so the tree held in memory is bounded by the largest row and
//! never by the number of rows in the export.

use tracing::{debug, warn};

use crate::constants::{EXPORT_OK_CODE, elements};
use crate::error::{FmpError, Result};
use crate::importer::{ImportContext, RowImporter};
use crate::models::{DatabaseMetadata, ImportStats, ProductInfo};

/// A parsed XML element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Accumulated character data (only kept for text-bearing elements)
    pub text: String,
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag: tag.into(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ElementNode> {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    pub fn first_child(&self, tag: &str) -> Option<&ElementNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ElementNode::subtree_size)
            .sum::<usize>()
    }
}

/// Builds the element tree from parser events and dispatches completed
/// header elements and rows.
pub struct TreeBuilder<'a, I: RowImporter + ?Sized> {
    stack: Vec<ElementNode>,
    context: ImportContext,
    importer: &'a mut I,
    live_nodes: usize,
    peak_live_nodes: usize,
    rows_imported: usize,
}

impl<'a, I: RowImporter + ?Sized> TreeBuilder<'a, I> {
    pub fn new(context: ImportContext, importer: &'a mut I) -> Self {
        Self {
            stack: Vec::new(),
            context,
            importer,
            live_nodes: 0,
            peak_live_nodes: 0,
            rows_imported: 0,
        }
    }

    pub fn start_element(&mut self, tag: &str, attributes: Vec<(String, String)>) {
        if !elements::ALL.contains(&tag) {
            debug!("Element <{}> is not part of FMPXMLRESULT; it will not be retained", tag);
        }

        self.stack.push(ElementNode::new(tag, attributes));
        self.live_nodes += 1;
        self.peak_live_nodes = self.peak_live_nodes.max(self.live_nodes);
    }

    pub fn characters(&mut self, text: &str) {
        if let Some(node) = self.stack.last_mut() {
            if elements::TEXT_BEARING.contains(&node.tag.as_str()) {
                node.text.push_str(text);
            }
        }
    }

    /// Close the innermost open element. `position` is the reader's byte
    /// offset, used for error reporting only.
    pub fn end_element(&mut self, tag: &str, position: u64) -> Result<()> {
        let node = self.stack.pop().ok_or_else(|| {
            FmpError::malformed_xml(
                position,
                format!("end tag </{}> without matching start tag", tag),
            )
        })?;

        if node.tag != tag {
            return Err(FmpError::malformed_xml(
                position,
                format!("expected </{}>, found </{}>", node.tag, tag),
            ));
        }

        match node.tag.as_str() {
            elements::ROW => self.import_row(node),
            elements::FIELD => {
                self.context.header_mut().registry.add_field(&node.attributes)?;
                self.release(&node);
                Ok(())
            }
            elements::DATABASE => {
                let database = DatabaseMetadata::from_node(&node);
                debug!("Database metadata: {:?}", database);
                self.context.header_mut().database = database;
                self.release(&node);
                Ok(())
            }
            elements::PRODUCT => {
                let product = ProductInfo::from_node(&node);
                debug!("Exported by {:?} {:?}", product.name, product.version);
                self.context.header_mut().product = product;
                self.release(&node);
                Ok(())
            }
            elements::ERRORCODE => {
                let code = node.text.trim().to_string();
                if code != EXPORT_OK_CODE {
                    warn!("Export reports FileMaker error code {}", code);
                }
                self.context.header_mut().error_code = Some(code);
                self.release(&node);
                Ok(())
            }
            _ => {
                self.retain(node);
                Ok(())
            }
        }
    }

    /// Check that every element was closed and return the collected header
    /// state and counters.
    pub fn finish(self, position: u64) -> Result<(ImportContext, ImportStats)> {
        if let Some(open) = self.stack.last() {
            return Err(FmpError::malformed_xml(
                position,
                format!("unexpected end of document, <{}> is not closed", open.tag),
            ));
        }

        let stats = ImportStats {
            fields_registered: self.context.header().registry.len(),
            rows_imported: self.rows_imported,
            peak_live_nodes: self.peak_live_nodes,
            processing_time_ms: 0,
        };

        Ok((self.context, stats))
    }

    pub fn live_nodes(&self) -> usize {
        self.live_nodes
    }

    pub fn peak_live_nodes(&self) -> usize {
        self.peak_live_nodes
    }

    pub fn rows_imported(&self) -> usize {
        self.rows_imported
    }

    pub fn context(&self) -> &ImportContext {
        &self.context
    }

    fn import_row(&mut self, row: ElementNode) -> Result<()> {
        self.importer.import_row(&row, &self.context)?;
        self.rows_imported += 1;
        self.release(&row);
        Ok(())
    }

    /// Attach a closed node to its parent. Foreign elements and the closed
    /// document root are dropped.
    fn retain(&mut self, node: ElementNode) {
        if !elements::ALL.contains(&node.tag.as_str()) {
            self.release(&node);
            return;
        }

        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.release(&node),
        }
    }

    fn release(&mut self, node: &ElementNode) {
        self.live_nodes = self.live_nodes.saturating_sub(node.subtree_size());
    }
}
