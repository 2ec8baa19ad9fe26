pub mod locations;
pub mod map;
pub mod media;
pub mod reports;
