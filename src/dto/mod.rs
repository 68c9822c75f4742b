pub mod coerce;
pub mod products;
pub mod users;
