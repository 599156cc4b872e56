/*!
 * Constants
 *
 * Defaults and fixed tokens shared across the crate.
 */

// =============================================================================
// SLUGS & REFERENCES
// =============================================================================

/// Default slug separator
pub const DEFAULT_SEPARATOR: char = '.';

/// Delimiters that split one string reference into several
pub const REFERENCE_DELIMITERS: [char; 2] = [',', '|'];

/// Prefix of name-based permission checks, e.g. `canCreateUsers`
pub const METHOD_MARKER: &str = "can";

// =============================================================================
// ENVIRONMENT KEYS
// =============================================================================

pub const ENV_SEPARATOR: &str = "CAN_SEPARATOR";
pub const ENV_USES_UUID: &str = "CAN_USES_UUID";
pub const ENV_USES_SOFT_DELETES: &str = "CAN_USES_SOFT_DELETES";
pub const ENV_USES_TIMESTAMPS: &str = "CAN_USES_TIMESTAMPS";
pub const ENV_USES_LOAD_ON_UPDATE: &str = "CAN_USES_LOAD_ON_UPDATE";
pub const ENV_USES_EXTEND_CAN_METHOD: &str = "CAN_USES_EXTEND_CAN_METHOD";

/// Enables JSON log output in `init_tracing`
pub const ENV_TRACE_JSON: &str = "CAN_TRACE_JSON";
