//! In-place edits on a [`DocumentTree`].
//!
//! Each edit returns how many places it changed. Edits that need a particular
//! shape (bold-row) check it before writing anything, so a failed edit leaves
//! the tree as it was.

use regex::Regex;

use crate::error::{Error, Result};
use crate::tree::{DocumentTree, NodeId};

/* =============================== Tag sets ================================ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Removal {
    /// p, em, b: the element's children take its place.
    Inline,
    /// ol, ul: the list items become paragraphs, then take the list's place.
    List,
}

fn removal_class(tag: &str) -> Option<Removal> {
    match tag {
        "p" | "em" | "b" => Some(Removal::Inline),
        "ol" | "ul" => Some(Removal::List),
        _ => None,
    }
}

fn is_wrap_tag(tag: &str) -> bool {
    matches!(tag, "em" | "b")
}

/// Whole-token match of `word` with at most one trailing `.`, `?`, `!` or `,`.
/// Tokens are separated by plain spaces and case folding is ASCII only.
/// Group 1 is the token.
fn word_matcher(word: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?:^| )((?i-u:{})[.?!,]?)(?: |$)",
        regex::escape(word)
    ))
}

/* ============================== Replace tag ============================== */

impl DocumentTree {
    /// Relabels every `old` element to `new`. Text lines that happen to read
    /// `old` are left alone.
    pub fn replace_tag(&mut self, old: &str, new: &str) -> usize {
        let targets: Vec<NodeId> = self
            .descendants()
            .filter(|&id| self.is_element(id) && self.label(id) == old)
            .collect();
        for &id in &targets {
            self.node_mut(id).label = new.to_owned();
        }
        log::trace!("replace_tag <{old}> -> <{new}>: {} element(s)", targets.len());
        targets.len()
    }
}

/* ================================ Bold row =============================== */

impl DocumentTree {
    /// First `table` element, searched the way the row lookup has always
    /// done it: the node, then everything reachable through its next sibling,
    /// then its children.
    fn find_table(&self) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if self.is_element(id) && self.label(id) == "table" {
                return Some(id);
            }
            if let Some(child) = self.first_child(id) {
                stack.push(child);
            }
            if let Some(next) = self.next_sibling(id) {
                stack.push(next);
            }
        }
        None
    }

    /// Wraps the content of every column of table row `row` (1-based) in a
    /// `b` element.
    pub fn bold_row(&mut self, row: usize) -> Result<usize> {
        let table = self
            .find_table()
            .ok_or_else(|| Error::InvalidOperation("document has no <table>".into()))?;
        if row == 0 {
            return Err(Error::InvalidOperation("table rows are numbered from 1".into()));
        }
        let tr = self.children(table).nth(row - 1).ok_or_else(|| {
            Error::InvalidOperation(format!(
                "table has {} row(s), no row {row}",
                self.children(table).count()
            ))
        })?;
        if !self.is_element(tr) {
            return Err(Error::InvalidOperation(format!(
                "row {row} is the text `{}`, not a row element",
                self.label(tr)
            )));
        }

        let columns: Vec<NodeId> = self.children(tr).collect();
        if let Some(pos) = columns.iter().position(|&td| !self.is_element(td)) {
            return Err(Error::InvalidOperation(format!(
                "column {} of row {row} has no content to wrap",
                pos + 1
            )));
        }
        for &td in &columns {
            let content = self.first_child(td);
            let b = self.alloc("b", content, None);
            self.node_mut(td).first_child = Some(b);
        }
        Ok(columns.len())
    }
}

/* ================================ Remove tag ============================= */

impl DocumentTree {
    /// Removes every `tag` element, moving its content up a level. Only p, em,
    /// b, ol and ul can be removed; any other name changes nothing.
    pub fn remove_tag(&mut self, tag: &str) -> usize {
        let Some(class) = removal_class(tag) else {
            log::debug!("remove_tag: <{tag}> is not removable, ignoring");
            return 0;
        };

        let mut removed = 0usize;
        // the root stays the document element
        let mut stack: Vec<NodeId> = self.first_child(self.root()).into_iter().collect();
        while let Some(id) = stack.pop() {
            // the promoted first child may itself be a match
            while self.first_child(id).is_some() && self.label(id) == tag {
                self.splice_out(id, class);
                removed += 1;
            }
            if let Some(next) = self.next_sibling(id) {
                stack.push(next);
            }
            if let Some(child) = self.first_child(id) {
                stack.push(child);
            }
        }
        log::trace!("remove_tag <{tag}>: {removed} element(s)");
        removed
    }

    /// Replaces `id` by its children. `id` keeps its identity and takes over
    /// its first child's label and children; the remaining children are linked
    /// in between `id` and its old next sibling.
    fn splice_out(&mut self, id: NodeId, class: Removal) {
        let Some(first) = self.first_child(id) else {
            return;
        };
        if class == Removal::List {
            let items: Vec<NodeId> = self.children(id).collect();
            for item in items {
                if self.is_element(item) {
                    self.node_mut(item).label = "p".to_owned();
                }
            }
        }

        let first_node = self.node_mut(first);
        let label = std::mem::take(&mut first_node.label);
        let grandchild = first_node.first_child;
        let rest = first_node.next_sibling;

        if let Some(rest) = rest {
            let last = self.last_in_chain(rest);
            self.node_mut(last).next_sibling = self.next_sibling(id);
            self.node_mut(id).next_sibling = Some(rest);
        }
        let node = self.node_mut(id);
        node.label = label;
        node.first_child = grandchild;
    }
}

/* ================================= Add tag =============================== */

impl DocumentTree {
    /// Wraps every whole-word occurrence of `word` in text lines with a `tag`
    /// element. `word` must be ASCII letters and `tag` must be `em` or `b`;
    /// otherwise nothing changes.
    pub fn add_tag(&mut self, word: &str, tag: &str) -> usize {
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_alphabetic()) {
            log::debug!("add_tag: `{word}` is not a plain word, ignoring");
            return 0;
        }
        if !is_wrap_tag(tag) {
            log::debug!("add_tag: <{tag}> cannot wrap words, ignoring");
            return 0;
        }
        let matcher = match word_matcher(word) {
            Ok(re) => re,
            Err(err) => {
                log::warn!("add_tag: cannot match `{word}`: {err}");
                return 0;
            }
        };

        // new nodes are created after the snapshot and are never revisited
        let wrapped: usize = self
            .leaves()
            .into_iter()
            .map(|leaf| self.wrap_occurrences(leaf, &matcher, tag))
            .sum();
        log::trace!("add_tag `{word}` in <{tag}>: {wrapped} occurrence(s)");
        wrapped
    }

    fn wrap_occurrences(&mut self, leaf: NodeId, matcher: &Regex, tag: &str) -> usize {
        let mut current = leaf;
        let mut wrapped = 0usize;
        loop {
            let text = self.label(current);
            let Some(token) = matcher.captures(text).and_then(|caps| caps.get(1)) else {
                break;
            };
            let before = text[..token.start()].trim_matches(' ').to_owned();
            let rest = text[token.end()..].trim_matches(' ').to_owned();
            let token = token.as_str().to_owned();
            let token_leaf = self.alloc(token, None, None);

            let wrapper = if before.is_empty() {
                let node = self.node_mut(current);
                node.label = tag.to_owned();
                node.first_child = Some(token_leaf);
                current
            } else {
                let after = self.next_sibling(current);
                let wrapper = self.alloc(tag, Some(token_leaf), after);
                let node = self.node_mut(current);
                node.label = before;
                node.next_sibling = Some(wrapper);
                wrapper
            };
            wrapped += 1;

            if rest.is_empty() {
                break;
            }
            let after = self.next_sibling(wrapper);
            let rest_leaf = self.alloc(rest, None, after);
            self.node_mut(wrapper).next_sibling = Some(rest_leaf);
            current = rest_leaf;
        }
        wrapped
    }
}
