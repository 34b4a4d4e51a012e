use gate_catalog::{Flight, FlightCatalog, FlightStatus};
use gate_shared::{
    BoardingStatus, BoardingUpdateEvent, Passenger, PassengerId, QueueEntry,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::changes::{BoardingChange, Changed};
use crate::checkin::{CheckInDetails, FieldError};
use crate::clock::{Clock, SystemClock};
use crate::queue::BoardingQueue;
use crate::registry::PassengerRegistry;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReceipt {
    pub passenger: Passenger,
    pub flight: Flight,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardingStatusView {
    pub passenger: Passenger,
    pub queue_position: Option<usize>,
    pub flight_position: Option<usize>,
    pub boarding_status: BoardingStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDetails {
    pub passenger: Passenger,
    pub flight: Option<Flight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightStatusView {
    pub flight: Flight,
    pub pending: usize,
    pub queued: usize,
    pub boarded: usize,
}

/// Check-in and boarding admission service.
///
/// Owns the passenger registry and the boarding queue, each behind its own mutex.
/// Operations touching both always lock the registry first, then the queue.
pub struct BoardingScheduler {
    catalog: Arc<dyn FlightCatalog>,
    clock: Arc<dyn Clock>,
    registry: Mutex<PassengerRegistry>,
    queue: Mutex<BoardingQueue>,
}

impl BoardingScheduler {
    pub fn new(catalog: Arc<dyn FlightCatalog>) -> Self {
        Self::with_clock(catalog, Arc::new(SystemClock))
    }

    pub fn with_clock(catalog: Arc<dyn FlightCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            clock,
            registry: Mutex::new(PassengerRegistry::new()),
            queue: Mutex::new(BoardingQueue::new()),
        }
    }

    /// Check in from a raw request payload.
    pub async fn check_in_payload(
        &self,
        payload: &serde_json::Value,
    ) -> CoreResult<Changed<CheckInReceipt>> {
        match CheckInDetails::from_payload(payload) {
            Ok(details) => self.check_in(details).await,
            Err(e) => Err(self.validation_error(e).await),
        }
    }

    pub async fn check_in(&self, details: CheckInDetails) -> CoreResult<Changed<CheckInReceipt>> {
        if let Err(e) = details.validate() {
            return Err(self.validation_error(e).await);
        }

        let flight = match self.catalog.get_flight(&details.flight_number).await {
            Some(flight) => flight,
            None => {
                let valid_flights = self.catalog.flight_numbers().await;
                warn!(
                    flight_number = %details.flight_number,
                    ?valid_flights,
                    "Check-in rejected: unknown flight"
                );
                return Err(CoreError::InvalidFlight {
                    flight_number: details.flight_number,
                    valid_flights,
                });
            }
        };

        let passenger = {
            let mut registry = self.registry.lock().await;
            let boarding_time = self.clock.now();
            registry.register(details, boarding_time)
        };

        info!(
            passenger_id = passenger.id,
            flight_number = %passenger.flight_number,
            boarding_group = %passenger.boarding_group,
            boarding_pass = %passenger.boarding_pass,
            "Passenger checked in"
        );

        let change = BoardingChange::CheckedIn {
            passenger_id: passenger.id,
            flight_number: passenger.flight_number.clone(),
        };
        Ok(Changed::new(CheckInReceipt { passenger, flight }, change))
    }

    pub async fn passenger(&self, id: PassengerId) -> CoreResult<Passenger> {
        self.registry
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or(CoreError::NotFound(id))
    }

    pub async fn passenger_details(&self, id: PassengerId) -> CoreResult<PassengerDetails> {
        let passenger = self.passenger(id).await?;
        let flight = self.catalog.get_flight(&passenger.flight_number).await;
        Ok(PassengerDetails { passenger, flight })
    }

    /// Admit every pending passenger of a flight into the boarding queue.
    ///
    /// Each Pending → Queued transition and its queue insertion happen under both locks,
    /// so concurrent check-ins and admissions never observe one without the other.
    /// Re-running it only picks up passengers checked in since the last call.
    pub async fn admit_flight(&self, flight_number: &str) -> Changed<usize> {
        let admitted = {
            let mut registry = self.registry.lock().await;
            let mut queue = self.queue.lock().await;

            let pending: Vec<QueueEntry> = registry
                .find_by_flight(flight_number)
                .filter(|p| p.status == BoardingStatus::Pending)
                .map(QueueEntry::for_passenger)
                .collect();

            let mut admitted = Vec::with_capacity(pending.len());
            for entry in pending {
                if queue.contains(entry.passenger_id) {
                    warn!(passenger_id = entry.passenger_id, "Pending passenger already queued, skipping");
                    continue;
                }
                match registry.mark_queued(entry.passenger_id) {
                    Ok(_) => {
                        queue.admit(flight_number, entry);
                        admitted.push(entry.passenger_id);
                    }
                    Err(e) => warn!(passenger_id = entry.passenger_id, error = %e, "Admission skipped"),
                }
            }
            admitted
        };

        if admitted.is_empty() {
            if self.catalog.get_flight(flight_number).await.is_none() {
                warn!(flight_number, "Start boarding requested for unknown flight");
            } else {
                debug!(flight_number, "Start boarding: nothing pending");
            }
        } else {
            info!(flight_number, admitted = admitted.len(), "Passengers admitted to boarding queue");
        }

        let count = admitted.len();
        Changed::new(
            count,
            BoardingChange::Admitted {
                flight_number: flight_number.to_string(),
                passenger_ids: admitted,
            },
        )
    }

    /// Zero-based rank in the global boarding order.
    pub async fn position_of(&self, id: PassengerId) -> Option<usize> {
        self.queue.lock().await.position_of(id)
    }

    pub async fn boarding_status(&self, id: PassengerId) -> CoreResult<BoardingStatusView> {
        let registry = self.registry.lock().await;
        let queue = self.queue.lock().await;

        let passenger = registry.get(id).cloned().ok_or(CoreError::NotFound(id))?;
        Ok(BoardingStatusView {
            queue_position: queue.position_of(id),
            flight_position: queue.flight_position_of(id),
            boarding_status: passenger.status,
            passenger,
        })
    }

    /// Current global boarding order.
    pub async fn snapshot(&self) -> Vec<QueueEntry> {
        self.queue.lock().await.snapshot()
    }

    pub async fn flight_snapshot(&self, flight_number: &str) -> Vec<QueueEntry> {
        self.queue.lock().await.flight_snapshot(flight_number)
    }

    /// Consistent copy of queue and passengers for observers.
    pub async fn board_state(&self) -> BoardingUpdateEvent {
        let registry = self.registry.lock().await;
        let queue = self.queue.lock().await;

        BoardingUpdateEvent {
            queue: queue.snapshot(),
            passengers: registry.all().clone(),
        }
    }

    /// Transition: Queued → Boarded for a specific passenger, removing their queue entry.
    pub async fn board_passenger(&self, id: PassengerId) -> CoreResult<Changed<Passenger>> {
        let passenger = {
            let mut registry = self.registry.lock().await;
            let mut queue = self.queue.lock().await;

            let current = registry.get(id).ok_or(CoreError::NotFound(id))?;
            if current.status != BoardingStatus::Queued {
                return Err(CoreError::InvalidTransition {
                    passenger_id: id,
                    from: current.status,
                    to: BoardingStatus::Boarded,
                });
            }

            let passenger = registry.mark_boarded(id)?.clone();
            if queue.remove(id).is_none() {
                warn!(passenger_id = id, "Queued passenger had no queue entry");
            }
            passenger
        };

        info!(passenger_id = id, flight_number = %passenger.flight_number, "Passenger boarded");

        let change = BoardingChange::Boarded {
            passenger_id: id,
            flight_number: passenger.flight_number.clone(),
        };
        Ok(Changed::new(passenger, change))
    }

    /// Board whoever is first in line for a flight.
    pub async fn board_next(&self, flight_number: &str) -> Option<Changed<Passenger>> {
        let passenger = {
            let mut registry = self.registry.lock().await;
            let mut queue = self.queue.lock().await;

            // The entry stays queued unless the transition succeeds
            let entry = queue.peek_next(flight_number)?;
            match registry.mark_boarded(entry.passenger_id) {
                Ok(p) => {
                    queue.pop_next(flight_number);
                    p.clone()
                }
                Err(e) => {
                    warn!(passenger_id = entry.passenger_id, error = %e, "Queue entry without queued passenger");
                    return None;
                }
            }
        };

        info!(passenger_id = passenger.id, flight_number, "Passenger boarded");

        let change = BoardingChange::Boarded {
            passenger_id: passenger.id,
            flight_number: flight_number.to_string(),
        };
        Some(Changed::new(passenger, change))
    }

    /// Catalog flights; those with any checked-in passenger are shown as boarding.
    pub async fn list_flights(&self) -> Vec<Flight> {
        let flights = self.catalog.list_flights().await;
        let boarding: HashSet<String> = {
            let registry = self.registry.lock().await;
            registry
                .all()
                .values()
                .map(|p| p.flight_number.clone())
                .collect()
        };

        flights
            .into_iter()
            .map(|f| {
                if boarding.contains(&f.flight_number) {
                    f.with_status(FlightStatus::Boarding)
                } else {
                    f
                }
            })
            .collect()
    }

    pub async fn flight_status(&self, flight_number: &str) -> CoreResult<FlightStatusView> {
        let Some(flight) = self.catalog.get_flight(flight_number).await else {
            return Err(CoreError::InvalidFlight {
                flight_number: flight_number.to_string(),
                valid_flights: self.catalog.flight_numbers().await,
            });
        };

        let (mut pending, mut queued, mut boarded) = (0, 0, 0);
        {
            let registry = self.registry.lock().await;
            for p in registry.find_by_flight(flight_number) {
                match p.status {
                    BoardingStatus::Pending => pending += 1,
                    BoardingStatus::Queued => queued += 1,
                    BoardingStatus::Boarded => boarded += 1,
                }
            }
        }

        let flight = if pending + queued + boarded > 0 {
            flight.with_status(FlightStatus::Boarding)
        } else {
            flight
        };

        Ok(FlightStatusView {
            flight,
            pending,
            queued,
            boarded,
        })
    }

    async fn validation_error(&self, error: FieldError) -> CoreError {
        debug!(error = %error, "Check-in payload rejected");
        CoreError::Validation {
            message: error.to_string(),
            valid_flights: self.catalog.flight_numbers().await,
        }
    }
}
