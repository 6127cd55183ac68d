// # txtctl-core
//
// Core library for txtctl, an ACME DNS-01 hook that publishes and removes a
// single TXT record through a hosting provider's HTML administration panel.
//
// ## Architecture Overview
//
// - **CredentialStore**: Trait for loading and saving the panel login
// - **TxtRecordProvider**: Trait for creating and deleting TXT records
// - **ChallengeEngine**: Loads credentials and drives one provider operation
//
// ## Design Principles
//
// 1. **One invocation, one mutation**: Every call performs at most one
//    mutating request; there is no retry, backoff or rollback here.
// 2. **Explicit state**: Sessions and credentials are passed as values, never
//    kept in process-wide mutable state.
// 3. **Library-First**: The CLI is a thin shell over this crate.

pub mod config;
pub mod engine;
pub mod error;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{CredentialStoreConfig, PanelConfig, TxtctlConfig};
pub use engine::ChallengeEngine;
pub use error::{Error, Result};
pub use store::{FileCredentialStore, MemoryCredentialStore};
pub use traits::{CredentialStore, Credentials, TxtChallenge, TxtOutcome, TxtRecordProvider};
