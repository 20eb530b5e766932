pub mod dataset;
pub mod district;
pub mod point;
pub mod report;

pub use dataset::DistrictDataset;
pub use district::DistrictRecord;
pub use point::GeoPoint;
pub use report::{AverageResult, ColumnMean, Neighbor, ProximityReport, SelectedDistrict};
