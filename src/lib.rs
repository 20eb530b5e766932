pub mod cli;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod processors;
pub mod readers;
pub mod spatial;
pub mod utils;

pub use error::{QueryError, Result};
pub use processors::nearby_district_averages;
