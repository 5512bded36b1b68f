//! First-child/next-sibling document tree.
//!
//! Every node carries a single `label`. A node with children is an element and
//! its label is the tag name; a node without children is a text line and its
//! label is the text. There is no other marker, so `<p>` with nothing inside
//! collapses into a text line reading `p`. The root is the one exception: it is
//! always rendered as an element.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Links only point
//! down (`first_child`) and right (`next_sibling`); anything that needs to look
//! upward starts over from the root.

use memchr::memchr;

use crate::error::{Error, Result};

/// Index of a node in its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) label: String,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
}

/// Knobs for [`DocumentTree::build_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Reject closing tags that don't match the open element, elements closed
    /// without content and elements left open at the end of input.
    pub strict: bool,
}

#[derive(Clone, Debug)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    root: NodeId,
}

/* ============================== Line scanning ============================ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line<'a> {
    Open(&'a str),
    Close(&'a str),
    Text(&'a str),
}

fn classify(line: &str, lineno: usize) -> Result<Line<'_>> {
    let bytes = line.as_bytes();
    if bytes.is_empty() {
        return Err(Error::malformed(lineno, "empty line"));
    }
    if bytes[0] != b'<' {
        return Ok(Line::Text(line));
    }
    let Some(gt) = memchr(b'>', bytes) else {
        return Err(Error::malformed(lineno, format!("`{line}` is missing its '>'")));
    };
    let is_end = bytes.get(1) == Some(&b'/');
    let name = &line[if is_end { 2 } else { 1 }..gt];
    if name.is_empty() {
        return Err(Error::malformed(lineno, "empty tag name"));
    }
    Ok(if is_end { Line::Close(name) } else { Line::Open(name) })
}

/// An element that is still open during build, with the tail of its child
/// chain so appends don't walk the siblings.
struct Frame {
    node: NodeId,
    last_child: Option<NodeId>,
}

impl Frame {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            last_child: None,
        }
    }
}

/* ================================= Build ================================= */

impl DocumentTree {
    /// Builds a tree from one token per line. The first line must open the
    /// document element; it labels the root and is otherwise discarded.
    pub fn build<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with(lines, BuildOptions::default())
    }

    pub fn build_with<I, S>(lines: I, options: BuildOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines.into_iter();
        let Some(first) = lines.next() else {
            return Err(Error::malformed(1, "document is empty"));
        };
        let root_label = match classify(first.as_ref(), 1)? {
            Line::Open(name) => name.to_owned(),
            _ => {
                return Err(Error::malformed(
                    1,
                    "first line must open the document element",
                ))
            }
        };

        let mut tree = DocumentTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(root_label, None, None);

        let mut open = vec![Frame::new(tree.root)];
        let mut lineno = 1usize;
        for line in lines {
            lineno += 1;
            match classify(line.as_ref(), lineno)? {
                Line::Close(name) => tree.close(&mut open, name, lineno, options)?,
                Line::Open(name) => {
                    let id = tree.append(&mut open, name, lineno)?;
                    open.push(Frame::new(id));
                }
                Line::Text(text) => {
                    tree.append(&mut open, text, lineno)?;
                }
            }
        }

        if let Some(frame) = open.last() {
            let label = &tree.node(frame.node).label;
            if options.strict {
                return Err(Error::malformed(
                    lineno + 1,
                    format!("<{label}> is never closed"),
                ));
            }
            log::debug!(
                "{} element(s) still open at end of input, innermost <{label}>",
                open.len()
            );
        }
        Ok(tree)
    }

    fn append(&mut self, open: &mut [Frame], label: &str, lineno: usize) -> Result<NodeId> {
        let Some(parent) = open.last_mut() else {
            return Err(Error::malformed(
                lineno,
                format!("`{label}` follows the end of the document element"),
            ));
        };
        let id = self.alloc(label, None, None);
        match parent.last_child {
            Some(prev) => self.node_mut(prev).next_sibling = Some(id),
            None => self.node_mut(parent.node).first_child = Some(id),
        }
        parent.last_child = Some(id);
        Ok(id)
    }

    fn close(
        &self,
        open: &mut Vec<Frame>,
        name: &str,
        lineno: usize,
        options: BuildOptions,
    ) -> Result<()> {
        let Some(frame) = open.pop() else {
            return Err(Error::malformed(
                lineno,
                format!("</{name}> has no open element to close"),
            ));
        };
        let label = &self.node(frame.node).label;
        if label != name {
            if options.strict {
                return Err(Error::malformed(
                    lineno,
                    format!("</{name}> does not match <{label}>"),
                ));
            }
            log::debug!("line {lineno}: </{name}> closes <{label}>");
        }
        if options.strict && frame.last_child.is_none() {
            return Err(Error::malformed(lineno, format!("<{label}> has no content")));
        }
        Ok(())
    }
}

/* ========================== Arena & navigation =========================== */

impl DocumentTree {
    pub(crate) fn alloc(
        &mut self,
        label: impl Into<String>,
        first_child: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label: label.into(),
            first_child,
            next_sibling,
        });
        id
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.node(id).label
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Element nodes are the ones with children, plus the root.
    pub fn is_element(&self, id: NodeId) -> bool {
        id == self.root || self.node(id).first_child.is_some()
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.node(id).first_child,
        }
    }

    /// Reachable nodes in document order, root first.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Reachable text leaves in document order. The root is never included.
    pub(crate) fn leaves(&self) -> Vec<NodeId> {
        self.descendants()
            .filter(|&id| !self.is_element(id))
            .collect()
    }

    /// Leaf labels in document order, joined by single spaces. Edits that split
    /// a text line trim the pieces at the split, so compare this string rather
    /// than a plain concatenation when checking that visible text survived.
    pub fn text_content(&self) -> String {
        self.leaves()
            .into_iter()
            .map(|id| self.label(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn count_elements(&self, name: &str) -> usize {
        self.descendants()
            .filter(|&id| self.is_element(id) && self.label(id) == name)
            .count()
    }

    pub(crate) fn last_in_chain(&self, mut id: NodeId) -> NodeId {
        while let Some(next) = self.node(id).next_sibling {
            id = next;
        }
        id
    }
}

pub struct Children<'a> {
    tree: &'a DocumentTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.node(id).next_sibling;
        Some(id)
    }
}

pub struct Descendants<'a> {
    tree: &'a DocumentTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        // sibling goes underneath so the whole child subtree comes out first
        if let Some(next) = node.next_sibling {
            self.stack.push(next);
        }
        if let Some(child) = node.first_child {
            self.stack.push(child);
        }
        Some(id)
    }
}

/* ================================ Render ================================= */

impl DocumentTree {
    /// Serializes the tree back to one token per line, each followed by `\n`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.nodes.len() * 8);
        let root = self.node(self.root);
        push_open_tag(&mut out, &root.label);
        if let Some(child) = root.first_child {
            self.render_chain(child, &mut out);
        }
        push_close_tag(&mut out, &root.label);
        out
    }

    fn render_chain(&self, first: NodeId, out: &mut String) {
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            let node = self.node(id);
            match node.first_child {
                None => {
                    out.push_str(&node.label);
                    out.push('\n');
                }
                Some(child) => {
                    push_open_tag(out, &node.label);
                    self.render_chain(child, out);
                    push_close_tag(out, &node.label);
                }
            }
            cursor = node.next_sibling;
        }
    }
}

fn push_open_tag(out: &mut String, name: &str) {
    out.push('<');
    out.push_str(name);
    out.push_str(">\n");
}

fn push_close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}
