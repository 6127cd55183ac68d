//! Core traits for txtctl
//!
//! - [`CredentialStore`]: Load and persist the panel login
//! - [`TxtRecordProvider`]: Create and delete TXT records at the provider

pub mod credential_store;
pub mod txt_provider;

pub use credential_store::{CredentialStore, Credentials};
pub use txt_provider::{TxtChallenge, TxtOutcome, TxtRecordProvider};
