pub mod itinerary;
pub mod user;
