//! Event types for the GYAAN event system
//!
//! Events are broadcast via EventBus and can be serialized for SSE
//! transmission to connected UI clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Platform event types
///
/// All session-store side effects that the presentation layer reacts to
/// flow through this central enum for type safety and exhaustive matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlatformEvent {
    /// XP was granted to the authenticated student
    XpGranted {
        account_id: String,
        amount: i64,
        /// Total XP after the grant
        xp: i64,
        /// Level recomputed from the new total
        level: i64,
        timestamp: DateTime<Utc>,
    },

    /// The rage meter filled and a reward became claimable
    ///
    /// Emitted exactly once per fill cycle; the meter has already wrapped
    /// when this fires.
    RewardReady {
        account_id: String,
        reward_description: String,
        timestamp: DateTime<Utc>,
    },

    /// First assessment completed; entry concepts unlocked
    AssessmentCompleted {
        account_id: String,
        xp_earned: i64,
        timestamp: DateTime<Utc>,
    },

    /// A teacher approved a pending student
    StudentApproved {
        account_id: String,
        section: String,
        timestamp: DateTime<Utc>,
    },

    /// A teacher removed a student from the active roster (approval
    /// flipped off; the account itself survives)
    StudentUnapproved {
        account_id: String,
        section: String,
        timestamp: DateTime<Utc>,
    },

    /// Teacher roster re-derived from the persisted account set
    RosterRefreshed {
        section: String,
        pending: usize,
        active: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast event bus shared by the session store and SSE handlers
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a new EventBus buffering up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events. Events emitted before subscription
    /// are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers.
    ///
    /// Lagging or absent subscribers are not an error; emission is
    /// fire-and-forget.
    pub fn emit(&self, event: PlatformEvent) {
        let _ = self.tx.send(event);
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}
