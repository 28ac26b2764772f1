use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuireError {
    #[error(transparent)]
    File(#[from] crate::file::FileError),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

pub type QuireResult<T> = Result<T, QuireError>;
