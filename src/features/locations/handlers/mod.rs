pub mod location_handler;

pub use location_handler::{list_districts, list_municipalities, list_provinces};
