//! Secure handling of key material
//!
//! This module provides:
//! - Zero-on-drop byte buffers for packed keystores
//! - Redacted `Debug` output for secret bytes

pub mod zeroize;

pub use self::zeroize::{Redacted, SecureBytes};
