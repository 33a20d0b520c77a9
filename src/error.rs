use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no task with id {0}")]
    NotFound(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a valid task id")]
    MalformedId(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
