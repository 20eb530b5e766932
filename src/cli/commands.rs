use crate::cli::args::{Cli, Commands, OutputFormat};
use crate::config::Settings;
use crate::geocoding::{GazetteerGeocoder, Geocoder, NominatimGeocoder};
use crate::models::{DistrictDataset, GeoPoint, ProximityReport};
use crate::processors::{DatasetAnalyzer, ProximityProcessor};
use crate::readers::DatasetReader;
use crate::utils::coordinates::parse_coordinate;
use crate::utils::progress::ProgressReporter;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Commands::Query {
            dataset,
            location,
            metals,
            k,
            gazetteer,
            index,
            format,
        } => {
            let dataset = load_dataset(&dataset)?;
            let metals = metals_or_all(metals, &dataset);

            let geocoder: Box<dyn Geocoder> = match gazetteer {
                Some(path) => Box::new(
                    GazetteerGeocoder::from_csv(&path)
                        .with_context(|| format!("Failed to load gazetteer {}", path.display()))?,
                ),
                None => Box::new(
                    NominatimGeocoder::new(&settings.geocoder)
                        .context("Failed to create Nominatim client")?,
                ),
            };

            let processor = ProximityProcessor::from_settings(geocoder, &settings.query)
                .with_neighbors(k.unwrap_or(settings.query.neighbors))
                .with_strategy(index.unwrap_or(settings.query.index));

            let progress = ProgressReporter::new_spinner(
                &format!("Locating '{}'...", location),
                format == OutputFormat::Json,
            );
            let report = processor.nearby_district_averages(&dataset, &location, &metals);
            progress.finish_and_clear();

            let report = report.with_context(|| format!("Query for '{}' failed", location))?;
            print_report(&report, format)?;
        }

        Commands::Nearest {
            dataset,
            lat,
            lon,
            metals,
            k,
            index,
            format,
        } => {
            let point = GeoPoint::new(parse_coordinate(&lat)?, parse_coordinate(&lon)?)
                .context("Invalid query point")?;
            let dataset = load_dataset(&dataset)?;
            let metals = metals_or_all(metals, &dataset);

            // Coordinates are given, so the geocoder is never consulted
            let processor =
                ProximityProcessor::from_settings(GazetteerGeocoder::new(), &settings.query)
                    .with_neighbors(k.unwrap_or(settings.query.neighbors))
                    .with_strategy(index.unwrap_or(settings.query.index));

            let report = processor
                .averages_near_point(&dataset, point, &metals)
                .context("Nearest-district query failed")?;
            print_report(&report, format)?;
        }

        Commands::Info { dataset } => {
            let dataset = load_dataset(&dataset)?;
            let summary = DatasetAnalyzer::new()
                .summarize(&dataset)
                .context("Failed to summarize dataset")?;
            println!("{}", summary.detailed_summary());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt().with_max_level(level);

    let initialized = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    initialized.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn load_dataset(path: &Path) -> Result<DistrictDataset> {
    DatasetReader::new()
        .read_dataset(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))
}

fn metals_or_all(metals: Vec<String>, dataset: &DistrictDataset) -> Vec<String> {
    if metals.is_empty() {
        dataset.metal_columns().to_vec()
    } else {
        metals
    }
}

fn print_report(report: &ProximityReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report.summary()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DistrictRecord;

    #[test]
    fn test_metals_default_to_all_columns() {
        let dataset = DistrictDataset::new(
            vec!["lead".to_string(), "arsenic".to_string()],
            vec![DistrictRecord::new("A", 18.52, 73.85, vec![5.0, 2.0])],
        )
        .unwrap();

        assert_eq!(metals_or_all(vec![], &dataset), vec!["lead", "arsenic"]);
        assert_eq!(
            metals_or_all(vec!["arsenic".to_string()], &dataset),
            vec!["arsenic"]
        );
    }
}
