pub mod changes;
pub mod checkin;
pub mod clock;
pub mod queue;
pub mod registry;
pub mod scheduler;

use gate_shared::{BoardingStatus, PassengerId};

pub use changes::{BoardingChange, Changed};
pub use checkin::{CheckInDetails, FieldError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use queue::BoardingQueue;
pub use registry::PassengerRegistry;
pub use scheduler::{
    BoardingScheduler, BoardingStatusView, CheckInReceipt, FlightStatusView, PassengerDetails,
};

/// Errors returned to the caller of a single request. None of them is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        valid_flights: Vec<String>,
    },
    #[error("Invalid flight number: {flight_number}")]
    InvalidFlight {
        flight_number: String,
        valid_flights: Vec<String>,
    },
    #[error("Passenger not found: {0}")]
    NotFound(PassengerId),
    #[error("Invalid state transition for passenger {passenger_id} from {from} to {to}")]
    InvalidTransition {
        passenger_id: PassengerId,
        from: BoardingStatus,
        to: BoardingStatus,
    },
}

impl CoreError {
    /// Flight numbers a client can retry with, when the error carries them.
    pub fn valid_flights(&self) -> Option<&[String]> {
        match self {
            CoreError::Validation { valid_flights, .. }
            | CoreError::InvalidFlight { valid_flights, .. } => Some(valid_flights),
            _ => None,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
