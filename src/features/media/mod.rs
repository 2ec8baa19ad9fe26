//! Media upload feature.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/media/upload` | Upload a photo or video, returns its public URL |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::MediaService;
