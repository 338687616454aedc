//! In-memory mail source for tests

use crate::error::MailError;
use famcal_domain::traits::MailSource;
use famcal_domain::RawEmail;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mail source backed by a queue
///
/// Every queued message is returned by the next `fetch_unseen` call and then
/// again by later calls until it is marked seen, matching IMAP `UNSEEN`
/// semantics. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockMailbox {
    unseen: Arc<Mutex<VecDeque<RawEmail>>>,
    seen: Arc<Mutex<Vec<String>>>,
    fail_fetch: bool,
}

impl MockMailbox {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailbox whose fetches always fail
    pub fn unreachable() -> Self {
        Self {
            fail_fetch: true,
            ..Self::default()
        }
    }

    /// Queue a message
    pub fn push(&self, email: RawEmail) {
        self.unseen.lock().unwrap().push_back(email);
    }

    /// Uids acknowledged so far, in order
    pub fn seen_uids(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    /// Messages still unseen
    pub fn unseen_count(&self) -> usize {
        self.unseen.lock().unwrap().len()
    }
}

impl MailSource for MockMailbox {
    type Error = MailError;

    fn fetch_unseen(&mut self) -> Result<Vec<RawEmail>, Self::Error> {
        if self.fail_fetch {
            return Err(MailError::Connection("mock mailbox unreachable".to_string()));
        }
        Ok(self.unseen.lock().unwrap().iter().cloned().collect())
    }

    fn mark_seen(&mut self, email: &RawEmail) -> Result<(), Self::Error> {
        let mut unseen = self.unseen.lock().unwrap();
        let before = unseen.len();
        unseen.retain(|e| e.uid != email.uid);
        if unseen.len() == before {
            return Err(MailError::Connection(format!("unknown uid {}", email.uid)));
        }
        self.seen.lock().unwrap().push(email.uid.clone());
        Ok(())
    }
}
