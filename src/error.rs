use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid frame range: start {start} is after end {end}")]
    InvalidRange { start: u32, end: u32 },

    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
    },

    #[error("frame {frame}, group {group}: expected {expected} vertices, found {found}")]
    FrameMismatch {
        frame: u32,
        group: usize,
        expected: usize,
        found: usize,
    },

    #[error("frame {frame} opens group {group} but frame 0 only has {groups}")]
    UnexpectedGroup {
        frame: u32,
        group: usize,
        groups: usize,
    },

    #[error("group {group} uses material `{name}` which is not in the material file")]
    UnknownMaterial { group: usize, name: String },

    #[error("line {line}: {message}")]
    Format { line: usize, message: String },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        return ConvertError::Io {
            path: path.into(),
            source,
        };
    }

    pub fn parse(file: &str, line: usize, message: impl Into<String>) -> Self {
        return ConvertError::Parse {
            file: file.to_string(),
            line,
            message: message.into(),
        };
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
