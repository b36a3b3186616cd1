//! Error types returned by the mesh assembler and loaders.

use thiserror::Error;

use crate::Attribute;

/// A single directive could not be applied.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormatError {
    #[error("Invalid {expected} '{token}'")]
    NumericFormat {
        token: String,
        expected: &'static str,
    },

    #[error("Only triangles are supported; face has {found} vertices")]
    UnsupportedTopology { found: usize },

    #[error("{attribute} index {index} out of range (1..={len})")]
    IndexOutOfRange {
        attribute: Attribute,
        index: i64,
        len: usize,
    },

    #[error("'{keyword}' expects {expected} argument(s), found {found}")]
    MissingArgument {
        keyword: String,
        expected: usize,
        found: usize,
    },

    #[error("Malformed face element '{token}' (expected pos/tex)")]
    MalformedFaceVertex { token: String },

    #[error("Too many vertices (>{})", u32::MAX)]
    TooManyVertices,
}

pub type FormatResult<T> = Result<T, FormatError>;

/// Failure while driving the assembler over a line source.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("Failed to read line {line}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed OBJ line {line}")]
    Parse {
        line: usize,
        #[source]
        source: FormatError,
    },
}

impl ObjError {
    /// 1-based line number the error was raised on.
    pub fn line(&self) -> usize {
        match self {
            ObjError::Io { line, .. } | ObjError::Parse { line, .. } => *line,
        }
    }

    /// The underlying format error, if this was not an I/O failure.
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            ObjError::Parse { source, .. } => Some(source),
            ObjError::Io { .. } => None,
        }
    }
}

pub type ObjResult<T> = Result<T, ObjError>;
