//! Map feature.
//!
//! Serves the tile settings for the client map widget and turns stored report
//! coordinates into markers. Reports whose coordinates cannot be parsed are
//! left off the map.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/map/settings` | Tile layer, attribution, default centre and zoom |
//! | GET | `/api/map/markers` | Markers for the newest reports with coordinates |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::MapService;
