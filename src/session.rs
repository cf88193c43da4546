//! Session-keyed conversation store.
//!
//! A process-wide map from session id to conversation handle, owned by the
//! router state rather than a module-level global so tests can build
//! isolated stores. Handles live for the process lifetime; there is no
//! eviction, so memory grows with the number of distinct sessions.

use std::sync::Arc;

use clap::ValueEnum;
use dashmap::DashMap;
use provider_protocol::relaying::HistoryTurn;
use uuid::Uuid;

use crate::gateway::{Conversation, ConversationFactory};

/// What to do with a client-supplied session id the store does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SessionIdPolicy {
    /// Discard it and mint a fresh random id.
    Mint,
    /// Honor it as the new session's id.
    Reuse,
}

pub struct SessionStore {
    sessions: DashMap<String, Arc<dyn Conversation>>,
    policy: SessionIdPolicy,
}

impl SessionStore {
    pub fn new(policy: SessionIdPolicy) -> Self {
        Self {
            sessions: DashMap::new(),
            policy,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Look up the handle for `supplied_id`, or create one via `factory`.
    ///
    /// A known id returns the stored handle unchanged and ignores `history`.
    /// Otherwise the effective id follows the store's [`SessionIdPolicy`]
    /// and the handle is created inside the map's entry lock, so concurrent
    /// first requests for the same id end up sharing a single handle.
    pub fn get_or_create(
        &self,
        supplied_id: Option<&str>,
        history: Vec<HistoryTurn>,
        factory: &dyn ConversationFactory,
    ) -> (Arc<dyn Conversation>, String) {
        let supplied_id = supplied_id.filter(|id| !id.is_empty());

        if let Some(id) = supplied_id {
            if let Some(existing) = self.sessions.get(id) {
                return (existing.clone(), id.to_string());
            }
        }

        let effective_id = match (self.policy, supplied_id) {
            (SessionIdPolicy::Reuse, Some(id)) => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };

        let handle = self
            .sessions
            .entry(effective_id.clone())
            .or_insert_with(|| factory.start(history))
            .clone();

        (handle, effective_id)
    }
}
