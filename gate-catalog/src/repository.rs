use async_trait::async_trait;

use crate::flight::Flight;

/// Read access to the flight catalog
#[async_trait]
pub trait FlightCatalog: Send + Sync {
    async fn get_flight(&self, flight_number: &str) -> Option<Flight>;

    async fn list_flights(&self) -> Vec<Flight>;

    async fn flight_numbers(&self) -> Vec<String> {
        self.list_flights()
            .await
            .into_iter()
            .map(|f| f.flight_number)
            .collect()
    }
}

/// Catalog seeded once at startup and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlightCatalog {
    flights: Vec<Flight>,
}

impl InMemoryFlightCatalog {
    pub fn new(flights: Vec<Flight>) -> Self {
        Self { flights }
    }
}

#[async_trait]
impl FlightCatalog for InMemoryFlightCatalog {
    async fn get_flight(&self, flight_number: &str) -> Option<Flight> {
        self.flights
            .iter()
            .find(|f| f.flight_number == flight_number)
            .cloned()
    }

    async fn list_flights(&self) -> Vec<Flight> {
        self.flights.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::FlightStatus;

    fn flight(number: &str) -> Flight {
        Flight {
            flight_number: number.to_string(),
            departure: "Paris".to_string(),
            destination: "Dubai".to_string(),
            departure_time: "18:45".to_string(),
            gate: "C3".to_string(),
            aircraft: "Airbus A380".to_string(),
            status: FlightStatus::OnTime,
        }
    }

    #[tokio::test]
    async fn test_lookup_and_listing_preserve_seed_order() {
        let catalog = InMemoryFlightCatalog::new(vec![flight("FL103"), flight("FL101")]);

        assert_eq!(catalog.get_flight("FL101").await.unwrap().gate, "C3");
        assert!(catalog.get_flight("FL999").await.is_none());
        assert_eq!(catalog.flight_numbers().await, vec!["FL103", "FL101"]);
    }
}
