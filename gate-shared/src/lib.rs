pub mod models;
pub mod pii;

pub use models::events::{BoardingUpdateEvent, PassengerStatusEvent};
pub use models::passenger::{
    BoardingGroup, BoardingStatus, Passenger, PassengerId, QueueEntry,
};
pub use pii::Masked;
