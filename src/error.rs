use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input lines do not describe a tree (stray closing tag, content after
    /// the root closed, empty line, ...).
    #[error("malformed document at line {line}: {reason}")]
    MalformedDocument { line: usize, reason: String },
    /// A mutation's precondition does not hold for this tree.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// An edit-script entry could not be parsed.
    #[error("invalid edit: {0}")]
    InvalidEdit(String),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedDocument {
            line,
            reason: reason.into(),
        }
    }
}
