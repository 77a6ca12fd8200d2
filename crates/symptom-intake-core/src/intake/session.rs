//! Per-conversation intake state.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{IntakeError, IntakeResult};
use crate::models::SymptomStruct;

/// State of one intake conversation.
///
/// Created when a conversation starts, mutated by every turn and cleared
/// when an intake completes.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    id: Uuid,
    /// Partial struct carried across turns while collecting
    pending: Option<SymptomStruct>,
    turns: u32,
    started_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeSession {
    /// Start a new idle session.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            pending: None,
            turns: 0,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The pending partial struct, if a clarification is outstanding.
    pub fn pending(&self) -> Option<&SymptomStruct> {
        self.pending.as_ref()
    }

    /// True while a clarification is outstanding.
    pub fn is_collecting(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of turns processed so far.
    pub fn turn_count(&self) -> u32 {
        self.turns
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Drop any pending struct and return to idle.
    pub fn reset(&mut self) {
        self.pending = None;
        self.touch();
    }

    pub(crate) fn take_pending(&mut self) -> Option<SymptomStruct> {
        self.pending.take()
    }

    pub(crate) fn set_pending(&mut self, pending: SymptomStruct) {
        self.pending = Some(pending);
    }

    pub(crate) fn record_turn(&mut self) {
        self.turns = self.turns.saturating_add(1);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Thread-safe session handle for hosts that may receive overlapping turns.
///
/// Holding the guard returned by [`SharedSession::begin_turn`] marks a turn
/// as in flight; a second turn on the same session is rejected until the
/// guard is dropped.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<IntakeSession>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::from_session(IntakeSession::new())
    }

    pub fn from_session(session: IntakeSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Claim the session for one turn.
    pub fn begin_turn(&self) -> IntakeResult<MutexGuard<'_, IntakeSession>> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => {
                tracing::warn!("Rejected overlapping turn on busy session");
                Err(IntakeError::TurnInProgress)
            }
            Err(TryLockError::Poisoned(e)) => Err(IntakeError::Poisoned(e.to_string())),
        }
    }

    /// True while another turn holds the session.
    pub fn is_busy(&self) -> bool {
        matches!(self.inner.try_lock(), Err(TryLockError::WouldBlock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = IntakeSession::new();
        assert!(!session.is_collecting());
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.started_at(), session.updated_at());
    }

    #[test]
    fn test_reset_clears_pending() {
        let mut session = IntakeSession::new();
        session.set_pending(SymptomStruct::new());
        assert!(session.is_collecting());

        session.reset();
        assert!(!session.is_collecting());
    }

    #[test]
    fn test_overlapping_turn_rejected() {
        let shared = SharedSession::new();

        let guard = shared.begin_turn().unwrap();
        assert!(shared.is_busy());
        assert!(matches!(shared.begin_turn(), Err(IntakeError::TurnInProgress)));

        drop(guard);
        assert!(!shared.is_busy());
        assert!(shared.begin_turn().is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedSession::new();
        let other = shared.clone();

        shared.begin_turn().unwrap().set_pending(SymptomStruct::new());
        assert!(other.begin_turn().unwrap().is_collecting());
    }

    #[test]
    fn test_busy_across_threads() {
        let shared = SharedSession::new();
        let guard = shared.begin_turn().unwrap();

        let handle = {
            let shared = shared.clone();
            std::thread::spawn(move || {
                matches!(shared.begin_turn(), Err(IntakeError::TurnInProgress))
            })
        };
        assert!(handle.join().unwrap());
        drop(guard);
    }
}
