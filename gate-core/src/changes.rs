use gate_shared::PassengerId;

/// Describes what a scheduler mutation changed, for the notifier to fan out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardingChange {
    CheckedIn {
        passenger_id: PassengerId,
        flight_number: String,
    },
    Admitted {
        flight_number: String,
        passenger_ids: Vec<PassengerId>,
    },
    Boarded {
        passenger_id: PassengerId,
        flight_number: String,
    },
}

impl BoardingChange {
    pub fn flight_number(&self) -> &str {
        match self {
            BoardingChange::CheckedIn { flight_number, .. }
            | BoardingChange::Admitted { flight_number, .. }
            | BoardingChange::Boarded { flight_number, .. } => flight_number,
        }
    }

    /// Passengers whose own status moved.
    pub fn affected_passengers(&self) -> &[PassengerId] {
        match self {
            BoardingChange::CheckedIn { passenger_id, .. }
            | BoardingChange::Boarded { passenger_id, .. } => std::slice::from_ref(passenger_id),
            BoardingChange::Admitted { passenger_ids, .. } => passenger_ids,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BoardingChange::CheckedIn { .. } => "checked_in",
            BoardingChange::Admitted { .. } => "admitted",
            BoardingChange::Boarded { .. } => "boarded",
        }
    }
}

/// Result of a mutation together with its change descriptor
#[derive(Debug, Clone)]
pub struct Changed<T> {
    pub value: T,
    pub change: BoardingChange,
}

impl<T> Changed<T> {
    pub fn new(value: T, change: BoardingChange) -> Self {
        Self { value, change }
    }

    pub fn into_parts(self) -> (T, BoardingChange) {
        (self.value, self.change)
    }
}
