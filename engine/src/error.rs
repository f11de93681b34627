//! Parse-time error types.
//!
//! Two propagation classes, per the engine's contract: fatal errors
//! (tokenization failures, unresolvable schema shapes) abort the call with a
//! single entry, while per-token errors are accumulated so one pass surfaces
//! every offending argument.

use argline_core::TokenizeError;
use argline_convert::ConvertError;
use thiserror::Error;

/// One structured parse error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A named token matched no declared long or short name.
    #[error("unknown argument: {token}")]
    UnknownArgument { token: String },

    /// An at-most-once argument was supplied a second time.
    #[error("argument '{name}' supplied more than once")]
    DuplicateArgument { name: String },

    /// A required argument was never supplied (validation phase).
    #[error("missing required argument: {name}")]
    MissingRequiredArgument { name: String },

    /// A converter rejected the literal text.
    #[error("argument '{name}': {source}")]
    ValueConversion {
        name: String,
        #[source]
        source: ConvertError,
    },

    /// A positional token arrived after every positional slot was filled
    /// and no remainder catch-all is declared.
    #[error("unexpected positional argument: {token}")]
    UnexpectedPositional { token: String },

    /// A non-boolean named argument appeared without an inline value.
    #[error("argument '{name}' requires a value")]
    MissingValue { name: String },

    /// A declared shape has no converter. A host programming error; fatal.
    #[error("unsupported shape for argument '{name}': {source}")]
    UnsupportedShape {
        name: String,
        #[source]
        source: ConvertError,
    },

    /// The input line could not be tokenized. Fatal.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

impl ParseError {
    /// Fatal errors abort the parse immediately; the rest accumulate.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Tokenize(_) | Self::UnsupportedShape { .. })
    }
}
