use serde::{Deserialize, Serialize};

/// Operational status shown on departure boards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightStatus {
    #[default]
    #[serde(rename = "On Time")]
    OnTime,
    Delayed,
    Boarding,
    Departed,
    Cancelled,
}

/// A scheduled flight as published by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    #[serde(alias = "flight_number")]
    pub flight_number: String,
    pub departure: String,
    pub destination: String,
    #[serde(alias = "departure_time")]
    pub departure_time: String,
    pub gate: String,
    pub aircraft: String,
    #[serde(default)]
    pub status: FlightStatus,
}

impl Flight {
    /// Copy of this flight with a different status, used for board displays.
    pub fn with_status(&self, status: FlightStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
