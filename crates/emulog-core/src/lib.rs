pub mod api;
pub mod parser;
pub mod report;
pub mod triggers;

pub const TOOL_NAME: &str = "emulog";

/// JSON schema version of emulog report envelopes.
/// This must be bumped only when the embed/envelope layout changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";
