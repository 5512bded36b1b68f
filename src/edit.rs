//! Edits as command-line values: `replace:OLD:NEW`, `bold-row:N`, `remove:TAG`
//! and `add:WORD:TAG`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::tree::DocumentTree;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    ReplaceTag { old: String, new: String },
    BoldRow(usize),
    RemoveTag(String),
    AddTag { word: String, tag: String },
}

impl Edit {
    /// Runs the edit and returns how many places changed.
    pub fn apply(&self, tree: &mut DocumentTree) -> Result<usize> {
        match self {
            Edit::ReplaceTag { old, new } => Ok(tree.replace_tag(old, new)),
            Edit::BoldRow(row) => tree.bold_row(*row),
            Edit::RemoveTag(tag) => Ok(tree.remove_tag(tag)),
            Edit::AddTag { word, tag } => Ok(tree.add_tag(word, tag)),
        }
    }
}

impl FromStr for Edit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.split(':');
        let kind = fields.next().unwrap_or_default();
        let args: Vec<&str> = fields.collect();
        if args.iter().any(|arg| arg.is_empty()) {
            return Err(Error::InvalidEdit(format!("empty field in `{s}`")));
        }

        let edit = match (kind, args.as_slice()) {
            ("replace", [old, new]) => Edit::ReplaceTag {
                old: (*old).to_owned(),
                new: (*new).to_owned(),
            },
            ("bold-row", [row]) => Edit::BoldRow(row.parse().map_err(|_| {
                Error::InvalidEdit(format!("`{row}` is not a row number"))
            })?),
            ("remove", [tag]) => Edit::RemoveTag((*tag).to_owned()),
            ("add", [word, tag]) => Edit::AddTag {
                word: (*word).to_owned(),
                tag: (*tag).to_owned(),
            },
            ("replace" | "add", _) => {
                return Err(Error::InvalidEdit(format!("`{s}` needs two fields after `{kind}:`")))
            }
            ("bold-row" | "remove", _) => {
                return Err(Error::InvalidEdit(format!("`{s}` needs one field after `{kind}:`")))
            }
            _ => {
                return Err(Error::InvalidEdit(format!(
                    "unknown edit `{kind}` (expected replace, bold-row, remove or add)"
                )))
            }
        };
        Ok(edit)
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::ReplaceTag { old, new } => write!(f, "replace:{old}:{new}"),
            Edit::BoldRow(row) => write!(f, "bold-row:{row}"),
            Edit::RemoveTag(tag) => write!(f, "remove:{tag}"),
            Edit::AddTag { word, tag } => write!(f, "add:{word}:{tag}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edits() {
        assert_eq!(
            "replace:em:b".parse::<Edit>().unwrap(),
            Edit::ReplaceTag {
                old: "em".into(),
                new: "b".into()
            }
        );
        assert_eq!("bold-row:2".parse::<Edit>().unwrap(), Edit::BoldRow(2));
        assert_eq!(
            "remove:ul".parse::<Edit>().unwrap(),
            Edit::RemoveTag("ul".into())
        );
        assert_eq!(
            "add:cat:em".parse::<Edit>().unwrap(),
            Edit::AddTag {
                word: "cat".into(),
                tag: "em".into()
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_edits() {
        for bad in [
            "",
            "swap:a:b",
            "replace:em",
            "replace:em:b:i",
            "bold-row:x",
            "bold-row:-1",
            "remove",
            "remove::",
            "add:cat:",
        ] {
            assert!(
                matches!(bad.parse::<Edit>(), Err(Error::InvalidEdit(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_display_matches_syntax() {
        for src in ["replace:em:b", "bold-row:3", "remove:p", "add:dog:b"] {
            assert_eq!(src.parse::<Edit>().unwrap().to_string(), src);
        }
    }

    #[test]
    fn test_apply_in_order() {
        let mut tree =
            DocumentTree::build("<html>\n<p>\nThe cat\n</p>\n</html>".lines()).unwrap();
        let edits: Vec<Edit> = ["add:cat:em", "replace:em:b", "remove:p"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let counts: Vec<usize> = edits
            .iter()
            .map(|edit| edit.apply(&mut tree).unwrap())
            .collect();
        assert_eq!(counts, [1, 1, 1]);
        assert_eq!(tree.render(), "<html>\nThe\n<b>\ncat\n</b>\n</html>\n");
    }

    #[test]
    fn test_apply_reports_failed_bold_row() {
        let mut tree = DocumentTree::build("<html>\nx\n</html>".lines()).unwrap();
        assert!(matches!(
            Edit::BoldRow(1).apply(&mut tree),
            Err(Error::InvalidOperation(_))
        ));
    }
}
