// type hint constants
pub const DEFAULT_TYPE_KEY: &str = "_class";

// document constants
pub const FIELD_SEPARATOR: &str = ".";

// metadata constants
/// Version reported by the store when the caller did not request versions.
pub const VERSION_NOT_REQUESTED: i64 = -1;
pub const UNASSIGNED_SEQ_NO: i64 = -2;
pub const UNASSIGNED_PRIMARY_TERM: i64 = 0;

// diagnostics constants
pub const WARNING_LIMIT: usize = 5;
pub const DEFAULT_MAX_DEPTH: usize = 64;

// geo constants
pub const GEO_LAT: &str = "lat";
pub const GEO_LON: &str = "lon";
pub const GEO_JSON_TYPE: &str = "type";
pub const GEO_JSON_COORDINATES: &str = "coordinates";
pub const GEO_JSON_GEOMETRIES: &str = "geometries";

// range constants
pub const RANGE_GT: &str = "gt";
pub const RANGE_GTE: &str = "gte";
pub const RANGE_LT: &str = "lt";
pub const RANGE_LTE: &str = "lte";

// sequence number constants
pub const SEQ_NO: &str = "seq_no";
pub const PRIMARY_TERM: &str = "primary_term";
