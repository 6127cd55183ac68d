//! Test doubles for engine contract tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use txtctl_core::error::{Error, Result};
use txtctl_core::traits::{Credentials, TxtChallenge, TxtOutcome, TxtRecordProvider};

/// How the mock provider answers
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Succeed, reporting the given zone
    Succeed { zone: String },
    /// Fail with a record-not-found error
    RecordMissing,
    /// Fail with an authentication error
    RejectLogin,
}

/// A mock TxtRecordProvider that records every call
#[derive(Clone)]
pub struct MockTxtProvider {
    behavior: MockBehavior,
    create_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    seen_usernames: Arc<Mutex<Vec<String>>>,
}

impl MockTxtProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            create_calls: Arc::new(AtomicUsize::new(0)),
            delete_calls: Arc::new(AtomicUsize::new(0)),
            seen_usernames: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding(zone: &str) -> Self {
        Self::new(MockBehavior::Succeed {
            zone: zone.to_string(),
        })
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn seen_usernames(&self) -> Vec<String> {
        self.seen_usernames.lock().unwrap().clone()
    }

    fn record(&self, credentials: &Credentials) {
        self.seen_usernames
            .lock()
            .unwrap()
            .push(credentials.username.clone());
    }
}

#[async_trait::async_trait]
impl TxtRecordProvider for MockTxtProvider {
    async fn create_txt(
        &self,
        credentials: &Credentials,
        challenge: &TxtChallenge,
    ) -> Result<TxtOutcome> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.record(credentials);
        match &self.behavior {
            MockBehavior::Succeed { zone } => Ok(TxtOutcome::Created { zone: zone.clone() }),
            MockBehavior::RecordMissing => Err(Error::record_not_found(challenge.record_name.clone())),
            MockBehavior::RejectLogin => Err(Error::auth("bad credentials")),
        }
    }

    async fn delete_txt(
        &self,
        credentials: &Credentials,
        challenge: &TxtChallenge,
    ) -> Result<TxtOutcome> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.record(credentials);
        match &self.behavior {
            MockBehavior::Succeed { zone } => Ok(TxtOutcome::Deleted {
                zone: zone.clone(),
                record_id: "42".to_string(),
            }),
            MockBehavior::RecordMissing => Err(Error::record_not_found(challenge.record_name.clone())),
            MockBehavior::RejectLogin => Err(Error::auth("bad credentials")),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A challenge for `www.example.com`
pub fn sample_challenge() -> TxtChallenge {
    TxtChallenge::new("www.example.com", "_acme-challenge.www", "token-value")
}
