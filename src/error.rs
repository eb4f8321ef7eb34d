use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read stylesheet: {0}")]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Compile(#[from] tailor::CompileError),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
