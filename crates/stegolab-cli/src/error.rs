use thiserror::Error;

use stegolab_core::StegoError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Stego(#[from] StegoError),

    /// Represents a failed or aborted password prompt
    #[error("Password prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Represents a failure to read an input or write a result file
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
