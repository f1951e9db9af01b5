//! Transient image errors

use std::io;
use thiserror::Error;

/// Problems with the content of a transient image stream.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Underlying read/write failure, including truncated files.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The magic value is not one of the supported versions.
    #[error("Unknown File version: {0}")]
    UnknownVersion(String),

    /// Only pixel mode 10 is understood.
    #[error("only pixel mode {expected} images are supported, found mode {found}")]
    UnsupportedPixelMode { expected: u32, found: u32 },

    /// Header declares a pixel interpretation block of the wrong size.
    #[error("wrong PixelInterpretationBlockSize {found}, expected {expected}")]
    BlockSize { expected: u32, found: u32 },

    /// Pixel data does not match the header dimensions.
    #[error("pixel data holds {actual} values but the header requires {expected}")]
    DataLength { expected: usize, actual: usize },
}

/// Errors raised while reading or writing a transient image file. Each one
/// names the file involved.
#[derive(Debug, Error)]
pub enum TransientImageError {
    /// Reading failed.
    #[error("Exception reading {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: FormatError,
    },

    /// Writing failed.
    #[error("Exception writing {file}: {source}")]
    Write {
        file: String,
        #[source]
        source: FormatError,
    },
}

impl TransientImageError {
    /// Wraps a read failure with the file name.
    ///
    /// * `file`   - The file name.
    /// * `source` - The underlying cause.
    pub fn read<E: Into<FormatError>>(file: &str, source: E) -> Self {
        Self::Read {
            file: file.to_owned(),
            source: source.into(),
        }
    }

    /// Wraps a write failure with the file name.
    ///
    /// * `file`   - The file name.
    /// * `source` - The underlying cause.
    pub fn write<E: Into<FormatError>>(file: &str, source: E) -> Self {
        Self::Write {
            file: file.to_owned(),
            source: source.into(),
        }
    }

    /// Returns the underlying cause.
    pub fn cause(&self) -> &FormatError {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => source,
        }
    }
}
