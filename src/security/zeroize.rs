//! Secure memory zeroization utilities
//!
//! Keystore buffers carry raw key material. Buffers read from storage and
//! buffers produced by packing are wrapped in `SecureBytes` so they are wiped
//! when dropped. Uses the `zeroize` crate so the compiler cannot elide the
//! zeroing.

use std::fmt;
use ::zeroize::ZeroizeOnDrop;

/// A byte buffer that zeros its memory on drop
#[derive(Clone, Default, PartialEq, Eq, ZeroizeOnDrop)]
pub struct SecureBytes {
    inner: Vec<u8>,
}

impl SecureBytes {
    pub fn new(data: Vec<u8>) -> Self {
        Self { inner: data }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn expose(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecureBytes")
            .field(&Redacted(self.inner.len()))
            .finish()
    }
}

/// Debug stand-in for secret bytes: prints only the length
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Redacted(pub usize);

impl fmt::Debug for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<redacted {} bytes>", self.0)
    }
}
