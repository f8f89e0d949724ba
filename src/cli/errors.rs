//! CLI-specific error types
//!
//! All CLI errors are fatal: the process prints them and exits non-zero.

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("BOOKSHELF_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    #[error("BOOKSHELF_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        CliError::BootFailed(msg.into())
    }

    pub fn code_str(&self) -> &'static str {
        match self {
            CliError::Config(_) => "BOOKSHELF_CLI_CONFIG_ERROR",
            CliError::BootFailed(_) => "BOOKSHELF_CLI_BOOT_FAILED",
        }
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        CliError::BootFailed(err.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = CliError::config_error("port must be > 0");
        assert_eq!(err.code_str(), "BOOKSHELF_CLI_CONFIG_ERROR");
        assert_eq!(err.to_string(), "BOOKSHELF_CLI_CONFIG_ERROR: port must be > 0");
    }

    #[test]
    fn test_storage_error_is_boot_failure() {
        let err = CliError::from(StorageError::corruption_at_offset(12, "Checksum mismatch"));
        assert_eq!(err.code_str(), "BOOKSHELF_CLI_BOOT_FAILED");
        assert!(err.to_string().contains("Checksum mismatch"));
    }
}
