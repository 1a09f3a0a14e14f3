/// Command ids are UUID v4 strings assigned at insert time.
pub type CommandId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
