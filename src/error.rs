//! Error taxonomy of the herbivore model.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FaunaError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FaunaError {
    /// Invalid parameters or an unsupported model combination. Always fatal.
    #[error("configuration error: {0}")]
    Config(String),

    /// An operation was called with an argument outside its domain.
    #[error("invalid argument in {context}: {message}")]
    InvalidArgument {
        context: &'static str,
        message: String,
    },

    /// A broken invariant, i.e. a programming error in the caller.
    #[error("logic error: {0}")]
    Logic(String),
}

impl FaunaError {
    pub fn invalid(context: &'static str, message: impl Into<String>) -> Self {
        FaunaError::InvalidArgument {
            context,
            message: message.into(),
        }
    }

    pub fn logic(message: impl Into<String>) -> Self {
        FaunaError::Logic(message.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, FaunaError::Config(_))
    }
}
