use thiserror::Error;

#[derive(Error, Debug)]
pub enum LawDeskError {
    #[error("{0}")]
    InputValidation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LawDeskError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::InputValidation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, LawDeskError>;
