//! Error types for keyring

use crate::tlv::Discriminator;
use thiserror::Error;

/// Main error type for keyring operations
#[derive(Error, Debug)]
pub enum KeyringError {
    // Format errors
    #[error("Truncated {section}: need {needed} bytes, have {available}")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Invalid discriminator for {section}: {found}")]
    InvalidDiscriminator {
        section: &'static str,
        found: Discriminator,
    },

    #[error("Length mismatch in {section}: expected {expected}, got {actual}")]
    LengthMismatch {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Configuration section is present but empty")]
    EmptyConfiguration,

    #[error("Length {0} does not fit in a u32 length field")]
    LengthOverflow(usize),

    // Registry errors
    #[error("Unrecognized algorithm: {0}")]
    UnrecognizedAlgorithm(Discriminator),

    #[error("Unknown algorithm name: {0}")]
    UnknownAlgorithmName(String),

    #[error("Missing required configuration for {algorithm}: {field}")]
    MissingConfiguration {
        algorithm: &'static str,
        field: &'static str,
    },

    #[error("Discriminator already registered: {0}")]
    DuplicateDiscriminator(Discriminator),

    #[error("Discriminator is reserved: {0}")]
    ReservedDiscriminator(Discriminator),

    // Keystore errors
    #[error("Keystore entry not found")]
    EntryNotFound,

    #[error("Keystore not found")]
    KeystoreNotFound,

    #[error("Keystore already exists")]
    KeystoreAlreadyExists,

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    // Storage errors
    #[error("Storage error: {0}")]
    StorageError(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl KeyringError {
    /// Shorthand for a `Truncated` error
    pub(crate) fn truncated(section: &'static str, needed: usize, available: usize) -> Self {
        KeyringError::Truncated {
            section,
            needed,
            available,
        }
    }

    /// Whether this error came from malformed input bytes
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            KeyringError::Truncated { .. }
                | KeyringError::InvalidDiscriminator { .. }
                | KeyringError::LengthMismatch { .. }
                | KeyringError::EmptyConfiguration
                | KeyringError::UnrecognizedAlgorithm(_)
                | KeyringError::MissingConfiguration { .. }
        )
    }
}

impl From<std::io::Error> for KeyringError {
    fn from(err: std::io::Error) -> Self {
        KeyringError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for KeyringError {
    fn from(err: serde_json::Error) -> Self {
        KeyringError::StorageError(format!("JSON error: {}", err))
    }
}

impl From<hex::FromHexError> for KeyringError {
    fn from(err: hex::FromHexError) -> Self {
        KeyringError::InvalidKeyFormat(format!("Hex decode error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, KeyringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_classification() {
        assert!(KeyringError::truncated("entry", 12, 3).is_format_error());
        assert!(KeyringError::EmptyConfiguration.is_format_error());
        assert!(!KeyringError::EntryNotFound.is_format_error());
        assert!(!KeyringError::StorageError("disk".to_string()).is_format_error());
    }

    #[test]
    fn test_hex_error_conversion() {
        let err: KeyringError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, KeyringError::InvalidKeyFormat(_)));
    }

    #[test]
    fn test_display() {
        let err = KeyringError::truncated("key", 24, 20);
        assert_eq!(err.to_string(), "Truncated key: need 24 bytes, have 20");
    }
}
