use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Coarse failure category, used by callers that only care what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resource,
    Parse,
    Shape,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("can't open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("can't create {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("input has no header row")]
    EmptyInput,

    #[error("line {line}: could not convert '{value}' to float: {source}")]
    Parse {
        line: u64,
        value: String,
        source: ParseFloatError,
    },

    #[error("line {line}: row has {fields} fields, no column {column}")]
    Shape { line: u64, column: usize, fields: usize },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Open { .. } | ConvertError::Create { .. } | ConvertError::Io(_) => {
                ErrorKind::Resource
            }
            ConvertError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ErrorKind::Resource,
                _ => ErrorKind::Parse,
            },
            ConvertError::EmptyInput | ConvertError::Parse { .. } => ErrorKind::Parse,
            ConvertError::Shape { .. } => ErrorKind::Shape,
        }
    }
}
