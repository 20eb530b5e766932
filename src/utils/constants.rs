/// Neighbor search defaults
pub const DEFAULT_NEIGHBORS: usize = 3;
pub const DEFAULT_LEAF_SIZE: usize = 40;

/// Mean Earth radius used to report central angles as kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic bounds in decimal degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Dataset column names (matched case-insensitively)
pub const DISTRICT_COLUMN: &str = "district";
pub const LAT_COLUMNS: &[&str] = &["lat", "latitude"];
pub const LON_COLUMNS: &[&str] = &["lon", "lng", "longitude"];

/// Gazetteer column names
pub const GAZETTEER_NAME_COLUMNS: &[&str] = &["name", "location", "place"];

/// Cell values read as a missing reading
pub const MISSING_MARKERS: &[&str] = &["", "na", "nan", "null", "n/a"];

/// Geocoding defaults
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("district-metals/", env!("CARGO_PKG_VERSION"));

/// Configuration sources
pub const CONFIG_FILE: &str = "district-metals.toml";
pub const ENV_PREFIX: &str = "DISTRICT_METALS";
