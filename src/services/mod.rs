pub mod account_service;
pub mod itinerary_generation_service;
pub mod itinerary_service;
pub mod password;
