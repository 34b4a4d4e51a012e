use gate_shared::BoardingGroup;
use serde_json::{Map, Value};

const MIN_AGE: u8 = 1;
const MAX_AGE: u8 = 120;

/// Validated input of a check-in request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInDetails {
    pub name: String,
    pub age: u8,
    pub contact: String,
    pub seat_preference: String,
    pub flight_number: String,
    pub boarding_group: BoardingGroup,
    pub checked_bags: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Check-in payload must be a JSON object")]
    NotAnObject,
    #[error("Missing required field: {0}")]
    Missing(&'static str),
    #[error("Field {0} must be a string")]
    NotAString(&'static str),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl CheckInDetails {
    pub fn new(
        name: impl Into<String>,
        age: u8,
        contact: impl Into<String>,
        seat_preference: impl Into<String>,
        flight_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            contact: contact.into(),
            seat_preference: seat_preference.into(),
            flight_number: flight_number.into(),
            boarding_group: BoardingGroup::default(),
            checked_bags: 0,
        }
    }

    pub fn with_group(mut self, boarding_group: BoardingGroup) -> Self {
        self.boarding_group = boarding_group;
        self
    }

    pub fn with_checked_bags(mut self, checked_bags: u32) -> Self {
        self.checked_bags = checked_bags;
        self
    }

    /// Parses a raw check-in payload.
    ///
    /// `name`, `age`, `contact`, `seatPreference` and `flightNumber` are required strings
    /// (snake_case spellings are accepted too). `boardingGroup` and `checkedBags` are optional.
    pub fn from_payload(payload: &Value) -> Result<Self, FieldError> {
        let fields = payload.as_object().ok_or(FieldError::NotAnObject)?;

        let name = required_str(fields, "name", &["name"])?;
        let age_raw = required_str(fields, "age", &["age"])?;
        let contact = required_str(fields, "contact", &["contact"])?;
        let seat_preference =
            required_str(fields, "seatPreference", &["seatPreference", "seat_preference", "seat"])?;
        let flight_number =
            required_str(fields, "flightNumber", &["flightNumber", "flight_number"])?;

        let age = age_raw.trim().parse::<u32>().map_err(|_| FieldError::Invalid {
            field: "age",
            reason: format!("'{}' is not a whole number", age_raw),
        })?;
        let age = u8::try_from(age)
            .ok()
            .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
            .ok_or_else(age_out_of_range)?;

        let boarding_group = match lookup(fields, &["boardingGroup", "boarding_group"]) {
            None | Some(Value::Null) => BoardingGroup::default(),
            Some(Value::String(s)) => BoardingGroup::parse(s).ok_or_else(|| FieldError::Invalid {
                field: "boardingGroup",
                reason: format!("'{}' is not one of A, B, C", s),
            })?,
            Some(_) => return Err(FieldError::NotAString("boardingGroup")),
        };

        let checked_bags = match lookup(fields, &["checkedBags", "checked_bags"]) {
            None | Some(Value::Null) => 0,
            Some(v) => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| FieldError::Invalid {
                    field: "checkedBags",
                    reason: "must be a non-negative integer".to_string(),
                })?,
        };

        let details = Self {
            name: name.trim().to_string(),
            age,
            contact: contact.trim().to_string(),
            seat_preference: seat_preference.trim().to_string(),
            flight_number: flight_number.trim().to_string(),
            boarding_group,
            checked_bags,
        };
        details.validate()?;
        Ok(details)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if self.name.trim().chars().count() < 2 {
            return Err(FieldError::Invalid {
                field: "name",
                reason: "must be at least 2 characters".to_string(),
            });
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(age_out_of_range());
        }
        for (field, value) in [
            ("contact", &self.contact),
            ("seatPreference", &self.seat_preference),
            ("flightNumber", &self.flight_number),
        ] {
            if value.trim().is_empty() {
                return Err(FieldError::Invalid {
                    field,
                    reason: "must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn age_out_of_range() -> FieldError {
    FieldError::Invalid {
        field: "age",
        reason: format!("must be between {} and {}", MIN_AGE, MAX_AGE),
    }
}

fn lookup<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| fields.get(*k))
}

fn required_str<'a>(
    fields: &'a Map<String, Value>,
    field: &'static str,
    keys: &[&str],
) -> Result<&'a str, FieldError> {
    match lookup(fields, keys) {
        None | Some(Value::Null) => Err(FieldError::Missing(field)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(FieldError::NotAString(field)),
    }
}
