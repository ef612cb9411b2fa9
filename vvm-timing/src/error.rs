//! Error taxonomy for the timing core: malformed `Config.txt` and malformed
//! resolved-trace (`Data.txt`) lines. Both are fatal to the timing run.

use thiserror::Error;
use vvm::error::DecodeError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config.txt is missing required key `{key}`")]
    MissingKey { key: &'static str },

    #[error("Config.txt key `{key}` has non-integer value `{value}`")]
    NotAnInteger { key: &'static str, value: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("Data.txt line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: DecodeError,
    },

    #[error("Data.txt line {line}: malformed address list `{text}`")]
    BadAddressList { line: usize, text: String },

    #[error("Data.txt line {line}: malformed MTCL vector length `{text}`")]
    BadVectorLength { line: usize, text: String },
}
