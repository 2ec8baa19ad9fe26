/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Channel used by the `reports` insert trigger
pub const REPORT_CREATED_CHANNEL: &str = "report_created";

/// Message returned when any required submission field is blank
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill all required fields.";
