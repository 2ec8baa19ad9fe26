pub mod map_handler;

pub use map_handler::{get_markers, get_settings};
