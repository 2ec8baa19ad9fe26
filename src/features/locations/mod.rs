//! Nepal administrative locations feature.
//!
//! Serves the static province → district → municipality table that drives the
//! cascading selectors on the report form, and validates submitted selections
//! against it.
//!
//! ## Data Hierarchy
//!
//! - Level 1: Provinces (Pradesh) - 7 regions
//! - Level 2: Districts (Jilla) - 77 regions
//! - Level 3: Municipalities (Nagarpalika / Gaunpalika)
//!
//! The default table is compiled into the binary; `LOCATIONS_PATH` replaces it
//! with a file of the same shape at start-up.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/locations/provinces` | List provinces |
//! | GET | `/api/locations/provinces/{province}/districts` | List districts in a province |
//! | GET | `/api/locations/provinces/{province}/districts/{district}/municipalities` | List municipalities in a district |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::LocationService;
