pub mod aggregator;
pub mod dataset_analyzer;
pub mod proximity;

pub use aggregator::Aggregator;
pub use dataset_analyzer::{ColumnSummary, DatasetAnalyzer, DatasetSummary, GeographicBounds};
pub use proximity::{nearby_district_averages, ProximityProcessor};
