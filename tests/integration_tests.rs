use district_metals::geocoding::GazetteerGeocoder;
use district_metals::models::GeoPoint;
use district_metals::processors::{DatasetAnalyzer, ProximityProcessor};
use district_metals::readers::DatasetReader;
use district_metals::spatial::{BallTree, IndexStrategy, LinearIndex, NeighborIndex};
use district_metals::{nearby_district_averages, QueryError};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_file(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create fixture");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write fixture");
    }
    path
}

fn fixture() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let dataset = write_file(
        &temp_dir,
        "districts.csv",
        &[
            "district,lat,lon,lead,arsenic,mercury",
            "A,18.52,73.85,5,2,",
            "B,18.53,73.86,7,4,0.2",
            "C,19.00,74.00,1,1,0.4",
            "D,28.61,77.21,9,9,0.9",
        ],
    );
    let gazetteer = write_file(
        &temp_dir,
        "places.csv",
        &[
            "name,lat,lon",
            "Shivajinagar,18.521,73.851",
            "New Delhi,28.6139,77.2090",
        ],
    );

    (temp_dir, dataset, gazetteer)
}

#[test]
fn test_query_from_files() {
    let (_dir, dataset_path, gazetteer_path) = fixture();

    let dataset = DatasetReader::new().read_dataset(&dataset_path).unwrap();
    let geocoder = GazetteerGeocoder::from_csv(&gazetteer_path).unwrap();

    let report = ProximityProcessor::new(geocoder)
        .with_neighbors(2)
        .nearby_district_averages(&dataset, "shivajinagar", &["lead", "arsenic", "mercury"])
        .unwrap();

    assert_eq!(report.result.districts, vec!["A", "B"]);
    assert_eq!(report.result.mean("lead"), Some(6.0));
    assert_eq!(report.result.mean("arsenic"), Some(3.0));
    // A has no mercury reading
    assert_eq!(report.result.mean("mercury"), Some(0.2));
    assert_eq!(report.selected.len(), 2);
}

#[test]
fn test_one_call_api() {
    let (_dir, dataset_path, gazetteer_path) = fixture();
    let dataset = DatasetReader::new().read_dataset(&dataset_path).unwrap();
    let geocoder = GazetteerGeocoder::from_csv(&gazetteer_path).unwrap();
    let metals = ["lead", "arsenic"];

    let three =
        nearby_district_averages(&dataset, "Shivajinagar", &metals, None, &geocoder).unwrap();
    assert_eq!(three.districts, vec!["A", "B", "C"]);
    assert!((three.mean("lead").unwrap() - 13.0 / 3.0).abs() < 1e-12);
    assert!((three.mean("arsenic").unwrap() - 7.0 / 3.0).abs() < 1e-12);

    let delhi =
        nearby_district_averages(&dataset, "New Delhi", &metals, Some(1), &geocoder).unwrap();
    assert_eq!(delhi.districts, vec!["D"]);
    assert_eq!(delhi.mean("lead"), Some(9.0));
}

#[test]
fn test_error_cases() {
    let (_dir, dataset_path, gazetteer_path) = fixture();
    let dataset = DatasetReader::new().read_dataset(&dataset_path).unwrap();
    let geocoder = GazetteerGeocoder::from_csv(&gazetteer_path).unwrap();

    assert!(matches!(
        nearby_district_averages(&dataset, "Atlantis", &["lead"], None, &geocoder),
        Err(QueryError::LocationNotFound { .. })
    ));
    assert!(matches!(
        nearby_district_averages(&dataset, "Shivajinagar", &["lead"], Some(5), &geocoder),
        Err(QueryError::InvalidNeighborCount {
            requested: 5,
            available: 4
        })
    ));
    assert!(matches!(
        nearby_district_averages(&dataset, "Shivajinagar", &["cadmium"], None, &geocoder),
        Err(QueryError::UnknownColumn { column }) if column == "cadmium"
    ));
}

#[test]
fn test_empty_dataset_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "district,lat,lon,lead").unwrap();

    let dataset = DatasetReader::new().read_dataset(file.path()).unwrap();
    let geocoder = GazetteerGeocoder::new().with_place("Pune", 18.52, 73.85).unwrap();

    assert!(matches!(
        nearby_district_averages(&dataset, "Pune", &["lead"], Some(1), &geocoder),
        Err(QueryError::EmptyDataset)
    ));
    assert!(matches!(
        DatasetAnalyzer::new().summarize(&dataset),
        Err(QueryError::EmptyDataset)
    ));
}

#[test]
fn test_report_serializes_to_json() {
    let (_dir, dataset_path, _) = fixture();
    let dataset = DatasetReader::new().read_dataset(&dataset_path).unwrap();

    let report = ProximityProcessor::new(GazetteerGeocoder::new())
        .with_neighbors(1)
        .with_strategy(IndexStrategy::Linear)
        .averages_near_point(&dataset, GeoPoint::new(18.52, 73.85).unwrap(), &["mercury"])
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["selected"][0]["district"], "A");
    assert_eq!(json["selected"][0]["distance_km"], 0.0);
    assert_eq!(json["result"]["districts"][0], "A");
    // No mercury reading for A: the mean is missing, not zero
    assert!(json["result"]["averages"][0]["mean"].is_null());
    assert_eq!(json["result"]["averages"][0]["samples"], 0);
}

#[test]
fn test_ball_tree_agrees_with_linear_scan_on_grid() {
    // Regular grid with many exact ties around the query point
    let points: Vec<GeoPoint> = (-8..=8)
        .flat_map(|i| {
            (-8..=8).map(move |j| GeoPoint::new(i as f64 * 0.5, j as f64 * 0.5).unwrap())
        })
        .collect();
    let tree = BallTree::with_leaf_size(&points, 3).unwrap();
    let oracle = LinearIndex::build(&points).unwrap();

    for query in [
        GeoPoint::new(0.0, 0.0).unwrap(),
        GeoPoint::new(0.25, 0.25).unwrap(),
        GeoPoint::new(-3.9, 2.1).unwrap(),
    ] {
        for k in [1, 4, 5, 9, 30, points.len()] {
            assert_eq!(
                tree.nearest(&query, k).unwrap(),
                oracle.nearest(&query, k).unwrap()
            );
        }
    }
}
