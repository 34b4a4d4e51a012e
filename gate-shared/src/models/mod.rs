pub mod events;
pub mod passenger;
