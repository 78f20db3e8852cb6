pub mod alphabet;
pub mod bitstreams;
pub mod decoder;
pub mod encoder;
pub mod pipeline;
pub mod properties;
pub mod storage;
pub mod symbol_table;
pub mod utils;

pub use alphabet::Alphabet;
pub use bitstreams::BitString;
pub use decoder::AdaptiveDecoder;
pub use encoder::AdaptiveEncoder;
pub use symbol_table::{CodeTableEntry, Delta, SymbolTable};

/// Errors raised by the codec and by the persisted-format readers.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The symbol is not part of the closed alphabet.
    #[error("symbol {0:?} is not part of the alphabet")]
    OutOfAlphabet(char),

    #[error("symbol {0:?} appears more than once in the alphabet")]
    DuplicateSymbol(char),

    /// A textual bitstring contained something other than '0' or '1'.
    #[error("invalid bit {0:?}, expected '0' or '1'")]
    InvalidBit(char),

    #[error("requested {bits} bits but only {available} are available")]
    Truncated { bits: usize, available: usize },

    #[error("malformed code table line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("missing property {0}")]
    MissingProperty(String),

    #[error("property {key} has malformed value {value:?}")]
    MalformedProperty { key: String, value: String },

    #[error("failed parsing the properties file")]
    Properties(#[from] java_properties::PropertiesError),

    #[error("failed writing the stats file")]
    Json(#[from] serde_json::Error),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;
