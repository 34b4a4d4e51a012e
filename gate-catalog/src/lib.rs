pub mod flight;
pub mod repository;

pub use flight::{Flight, FlightStatus};
pub use repository::{FlightCatalog, InMemoryFlightCatalog};
