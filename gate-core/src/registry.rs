use chrono::{NaiveTime, Utc};
use gate_shared::{BoardingStatus, Masked, Passenger, PassengerId};
use std::collections::BTreeMap;

use crate::checkin::CheckInDetails;
use crate::{CoreError, CoreResult};

/// Authoritative set of checked-in passengers.
///
/// Ids start at 1 and are never reused. Callers serialize access; the registry itself
/// is a plain single-owner structure.
#[derive(Debug, Default)]
pub struct PassengerRegistry {
    passengers: BTreeMap<PassengerId, Passenger>,
    last_id: PassengerId,
}

impl PassengerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue an id and boarding pass and store the passenger as `Pending`.
    pub fn register(&mut self, details: CheckInDetails, boarding_time: NaiveTime) -> Passenger {
        self.last_id += 1;
        let id = self.last_id;

        let passenger = Passenger {
            id,
            boarding_pass: Passenger::boarding_pass_for(&details.flight_number, id),
            flight_number: details.flight_number,
            name: details.name,
            age: details.age,
            seat: details.seat_preference,
            contact: Masked(details.contact),
            checked_bags: details.checked_bags,
            boarding_group: details.boarding_group,
            boarding_time,
            status: BoardingStatus::Pending,
            checked_in_at: Utc::now(),
        };

        self.passengers.insert(id, passenger.clone());
        passenger
    }

    pub fn get(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.get(&id)
    }

    pub fn find_by_flight<'a>(
        &'a self,
        flight_number: &'a str,
    ) -> impl Iterator<Item = &'a Passenger> + 'a {
        self.passengers
            .values()
            .filter(move |p| p.flight_number == flight_number)
    }

    pub fn all(&self) -> &BTreeMap<PassengerId, Passenger> {
        &self.passengers
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    /// Transition: Pending → Queued
    pub fn mark_queued(&mut self, id: PassengerId) -> CoreResult<&Passenger> {
        self.transition(id, BoardingStatus::Pending, BoardingStatus::Queued)
    }

    /// Transition: Queued → Boarded
    pub fn mark_boarded(&mut self, id: PassengerId) -> CoreResult<&Passenger> {
        self.transition(id, BoardingStatus::Queued, BoardingStatus::Boarded)
    }

    fn transition(
        &mut self,
        id: PassengerId,
        from: BoardingStatus,
        to: BoardingStatus,
    ) -> CoreResult<&Passenger> {
        let passenger = self.passengers.get_mut(&id).ok_or(CoreError::NotFound(id))?;

        if passenger.status != from {
            return Err(CoreError::InvalidTransition {
                passenger_id: id,
                from: passenger.status,
                to,
            });
        }

        passenger.status = to;
        Ok(passenger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(flight: &str) -> CheckInDetails {
        CheckInDetails::new("Ada Lovelace", 36, "555-0100", "window", flight)
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_ids_are_strictly_increasing_from_one() {
        let mut registry = PassengerRegistry::new();
        let ids: Vec<_> = (0..5)
            .map(|_| registry.register(details("FL101"), noon()).id)
            .collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(registry.get(3).unwrap().boarding_pass, "FL101-0003");
        assert_eq!(registry.get(3).unwrap().status, BoardingStatus::Pending);
    }

    #[test]
    fn test_find_by_flight() {
        let mut registry = PassengerRegistry::new();
        registry.register(details("FL101"), noon());
        registry.register(details("FL102"), noon());
        registry.register(details("FL101"), noon());

        let ids: Vec<_> = registry.find_by_flight("FL101").map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(registry.find_by_flight("FL999").count(), 0);
    }

    #[test]
    fn test_status_lifecycle() {
        let mut registry = PassengerRegistry::new();
        let id = registry.register(details("FL101"), noon()).id;

        // Pending → Boarded is not allowed
        assert_eq!(
            registry.mark_boarded(id).unwrap_err(),
            CoreError::InvalidTransition {
                passenger_id: id,
                from: BoardingStatus::Pending,
                to: BoardingStatus::Boarded,
            }
        );

        registry.mark_queued(id).unwrap();
        assert!(registry.mark_queued(id).is_err());
        assert_eq!(registry.mark_boarded(id).unwrap().status, BoardingStatus::Boarded);

        assert_eq!(registry.mark_queued(99).unwrap_err(), CoreError::NotFound(99));
    }
}
