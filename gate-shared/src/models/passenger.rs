use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::pii::Masked;

pub type PassengerId = u64;

/// Priority class; `A` boards before `B`, `B` before `C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum BoardingGroup {
    A,
    B,
    #[default]
    C,
}

impl BoardingGroup {
    pub const ALL: [BoardingGroup; 3] = [BoardingGroup::A, BoardingGroup::B, BoardingGroup::C];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardingGroup::A => "A",
            BoardingGroup::B => "B",
            BoardingGroup::C => "C",
        }
    }

    /// Case-insensitive parse of a group letter.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(BoardingGroup::A),
            "B" => Some(BoardingGroup::B),
            "C" => Some(BoardingGroup::C),
            _ => None,
        }
    }
}

impl fmt::Display for BoardingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Passenger lifecycle: Pending → Queued → Boarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardingStatus {
    Pending,
    Queued,
    Boarded,
}

impl fmt::Display for BoardingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BoardingStatus::Pending => "pending",
            BoardingStatus::Queued => "queued",
            BoardingStatus::Boarded => "boarded",
        };
        f.write_str(s)
    }
}

/// A checked-in passenger. Everything except `status` is fixed at check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: PassengerId,
    pub boarding_pass: String,
    pub flight_number: String,
    pub name: String,
    pub age: u8,
    pub seat: String,
    pub contact: Masked<String>,
    pub checked_bags: u32,
    pub boarding_group: BoardingGroup,
    #[serde(with = "hhmm")]
    pub boarding_time: NaiveTime,
    pub status: BoardingStatus,
    pub checked_in_at: DateTime<Utc>,
}

impl Passenger {
    /// Boarding pass number: flight number and zero-padded passenger id, e.g. `FL101-0007`.
    pub fn boarding_pass_for(flight_number: &str, id: PassengerId) -> String {
        format!("{}-{:04}", flight_number, id)
    }
}

/// A boarding queue slot. The derived ordering is the boarding policy:
/// group, then boarding time, then passenger id.
///
/// On the wire a slot is the tuple `[group, "HH:MM", passengerId]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueueEntry {
    pub boarding_group: BoardingGroup,
    pub boarding_time: NaiveTime,
    pub passenger_id: PassengerId,
}

impl QueueEntry {
    pub fn for_passenger(passenger: &Passenger) -> Self {
        Self {
            boarding_group: passenger.boarding_group,
            boarding_time: passenger.boarding_time,
            passenger_id: passenger.id,
        }
    }
}

impl Serialize for QueueEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let time = self.boarding_time.format(hhmm::FORMAT).to_string();
        (self.boarding_group, time, self.passenger_id).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QueueEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (boarding_group, time, passenger_id) =
            <(BoardingGroup, String, PassengerId)>::deserialize(deserializer)?;
        let boarding_time = NaiveTime::parse_from_str(&time, hhmm::FORMAT)
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            boarding_group,
            boarding_time,
            passenger_id,
        })
    }
}

/// `HH:MM` serde adapter for boarding times.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
