pub mod constants;
pub mod coordinates;
pub mod progress;

pub use constants::*;
pub use coordinates::{dms_to_decimal, parse_coordinate, validate_coordinates};
pub use progress::ProgressReporter;
