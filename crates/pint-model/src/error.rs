use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("check '{check_id}' is missing required parameter: {message}")]
    InvalidCheck { check_id: String, message: String },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
