use gate_core::{BoardingChange, BoardingScheduler};
use gate_shared::{BoardingUpdateEvent, PassengerId, PassengerStatusEvent};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

/// Fan-out of board state to connected observers.
///
/// Two broadcast channels: full `BoardingUpdateEvent`s for everyone, and
/// `PassengerStatusEvent`s that each connection filters by its joined passengers.
/// Publishing never waits on receivers; a lagging receiver loses messages and is
/// expected to resynchronize from a fresh state. Publishes are serialized, so
/// observers receive states in the order they were taken.
#[derive(Clone)]
pub struct BoardingNotifier {
    updates: broadcast::Sender<BoardingUpdateEvent>,
    notices: broadcast::Sender<PassengerStatusEvent>,
    publishing: Arc<Mutex<()>>,
}

impl BoardingNotifier {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (updates, _) = broadcast::channel(capacity);
        let (notices, _) = broadcast::channel(capacity);
        Self {
            updates,
            notices,
            publishing: Arc::new(Mutex::new(())),
        }
    }

    pub fn subscribe_updates(&self) -> broadcast::Receiver<BoardingUpdateEvent> {
        self.updates.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<PassengerStatusEvent> {
        self.notices.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.updates.receiver_count()
    }

    /// Broadcast the scheduler's current state after `change`.
    ///
    /// The state is copied out of the scheduler before sending, so no scheduler lock
    /// is held while observers are served. Copy and send happen under the publish lock.
    /// Returns the number of update receivers reached.
    pub async fn publish(&self, scheduler: &BoardingScheduler, change: &BoardingChange) -> usize {
        let reached = {
            let _publishing = self.publishing.lock().await;
            let state = scheduler.board_state().await;
            self.publish_state(state, change.affected_passengers())
        };
        debug!(
            change = change.kind(),
            flight_number = change.flight_number(),
            reached,
            "Boarding update published"
        );
        reached
    }

    pub fn publish_state(&self, state: BoardingUpdateEvent, affected: &[PassengerId]) -> usize {
        for notice in affected.iter().filter_map(|id| state.notice_for(*id)) {
            // No receivers is not an error
            let _ = self.notices.send(notice);
        }
        self.updates.send(state).unwrap_or(0)
    }
}

/// Passenger scopes joined by one connection. Join and leave are idempotent.
#[derive(Debug, Default)]
pub struct Subscriptions {
    passengers: HashSet<PassengerId>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the scope was newly joined.
    pub fn join(&mut self, passenger_id: PassengerId) -> bool {
        self.passengers.insert(passenger_id)
    }

    /// Returns `true` if the scope had been joined.
    pub fn leave(&mut self, passenger_id: PassengerId) -> bool {
        self.passengers.remove(&passenger_id)
    }

    pub fn is_joined(&self, passenger_id: PassengerId) -> bool {
        self.passengers.contains(&passenger_id)
    }

    pub fn wants(&self, notice: &PassengerStatusEvent) -> bool {
        self.is_joined(notice.passenger_id)
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }
}
