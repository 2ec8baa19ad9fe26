pub mod media_handler;

pub use media_handler::{multipart_error, read_media_field, upload_media};
