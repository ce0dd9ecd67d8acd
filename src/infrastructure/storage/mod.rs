//! Credential storage adapters.

mod keyring_storage;
mod memory_storage;

pub use keyring_storage::KeyringCredentialStorage;
pub use memory_storage::MemoryCredentialStorage;
