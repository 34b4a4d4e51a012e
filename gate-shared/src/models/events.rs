use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::passenger::{BoardingStatus, Passenger, PassengerId, QueueEntry};

/// Full board state pushed to every observer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardingUpdateEvent {
    pub queue: Vec<QueueEntry>,
    pub passengers: BTreeMap<PassengerId, Passenger>,
}

/// Status notice for a single passenger's scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerStatusEvent {
    pub passenger_id: PassengerId,
    pub status: BoardingStatus,
    pub queue_position: Option<usize>,
}

impl BoardingUpdateEvent {
    /// Status notice for one passenger as of this state.
    pub fn notice_for(&self, passenger_id: PassengerId) -> Option<PassengerStatusEvent> {
        let passenger = self.passengers.get(&passenger_id)?;
        Some(PassengerStatusEvent {
            passenger_id,
            status: passenger.status,
            queue_position: self.queue.iter().position(|e| e.passenger_id == passenger_id),
        })
    }
}
