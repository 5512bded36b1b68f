//! Line-oriented HTML document trees.
//!
//! A document is read one token per line (`<name>`, `</name>` or text) into a
//! first-child/next-sibling tree, edited in place and rendered back in the
//! same one-token-per-line shape.
//!
//! ```
//! use tagtree::DocumentTree;
//!
//! let mut tree = DocumentTree::build(["<html>", "The cat sat.", "</html>"])?;
//! tree.add_tag("cat", "em");
//! assert_eq!(tree.render(), "<html>\nThe\n<em>\ncat\n</em>\nsat.\n</html>\n");
//! # Ok::<(), tagtree::Error>(())
//! ```

mod edit;
mod error;
mod ops;
mod tree;

pub use edit::Edit;
pub use error::{Error, Result};
pub use tree::{BuildOptions, Children, Descendants, DocumentTree, NodeId};
