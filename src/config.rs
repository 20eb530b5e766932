//! Runtime settings, layered from built-in defaults, an optional TOML file,
//! and `DISTRICT_METALS__SECTION__KEY` environment variables (later wins).
//!
//! ```toml
//! [geocoder]
//! endpoint = "https://nominatim.openstreetmap.org"
//! user_agent = "my-survey-tool/1.0 (ops@example.org)"
//! timeout_secs = 10
//!
//! [query]
//! neighbors = 5
//! leaf_size = 40
//! index = "ball-tree"
//! ```

use crate::error::Result;
use crate::spatial::IndexStrategy;
use crate::utils::constants::{
    CONFIG_FILE, DEFAULT_LEAF_SIZE, DEFAULT_NEIGHBORS, DEFAULT_USER_AGENT, ENV_PREFIX,
    NOMINATIM_ENDPOINT,
};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub geocoder: GeocoderSettings,

    #[validate(nested)]
    pub query: QuerySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeocoderSettings {
    #[validate(url)]
    pub endpoint: String,

    #[validate(length(min = 1))]
    pub user_agent: String,

    /// No timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct QuerySettings {
    #[validate(range(min = 1))]
    pub neighbors: usize,

    #[validate(range(min = 1))]
    pub leaf_size: usize,

    #[serde(default)]
    pub index: IndexStrategy,
}

impl Settings {
    /// Load settings. An explicit `path` must exist; otherwise
    /// `district-metals.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::new(CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("geocoder.endpoint", NOMINATIM_ENDPOINT)?
            .set_default("geocoder.user_agent", DEFAULT_USER_AGENT)?
            .set_default("query.neighbors", DEFAULT_NEIGHBORS as i64)?
            .set_default("query.leaf_size", DEFAULT_LEAF_SIZE as i64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            neighbors: DEFAULT_NEIGHBORS,
            leaf_size: DEFAULT_LEAF_SIZE,
            index: IndexStrategy::default(),
        }
    }
}
