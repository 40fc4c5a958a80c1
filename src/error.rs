use alloc::string::String;

use thiserror::Error;

/// A content source capability that the engine requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    CountItems,
    CreateItemContent,
}

impl Capability {
    pub fn name(self) -> &'static str {
        match self {
            Self::CountItems => "count_items",
            Self::CreateItemContent => "create_item_content",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an engine could not be constructed.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("viewport host is not inside a scrollable container")]
    NoScrollContainer,
    #[error("default item height must be greater than zero")]
    ZeroDefaultHeight,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid engine arguments: {0}")]
    Validation(#[from] ValidationError),

    #[error("content source does not provide `{0}`")]
    Configuration(Capability),

    #[error("a refresh is already running")]
    Concurrency,

    #[error("refresh was cancelled before its rows were mounted")]
    Cancelled,

    #[error("engine has been destroyed")]
    Destroyed,

    #[error("content source error: {0}")]
    Source(String),
}

impl Error {
    /// Convenience constructor for failures raised by a content source.
    pub fn source_error(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
