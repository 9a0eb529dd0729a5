//! Nested TLV codec for keystore entries
//!
//! Every section is framed as `discriminator(8) ++ u32le(length) ++ value`:
//! - Key sections carry the algorithm discriminator and raw key bytes
//! - Configuration sections carry zero or more key/value configuration entries
//! - Keystore entries wrap one key section and one configuration section

pub mod config;
pub mod discriminator;
pub mod entry;
pub mod key;
pub mod primitive;

pub use config::{ConfigEntry, ConfigSection};
pub use discriminator::{Discriminator, HAS_CONFIGURATIONS, KEYSTORE_ENTRY, NO_CONFIGURATIONS};
pub use entry::KeystoreEntry;
pub use key::KeySection;
pub use primitive::{DISCRIMINATOR_LEN, HEADER_LEN, LENGTH_LEN};
