use crate::spatial::IndexStrategy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "district-metals")]
#[command(about = "Average heavy metal readings of the districts nearest a place")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Settings file [default: ./district-metals.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Geocode a place name and average readings of its nearest districts
    Query {
        #[arg(short, long, help = "District dataset CSV (district, lat, lon, metal columns)")]
        dataset: PathBuf,

        #[arg(short, long, help = "Place name to look up")]
        location: String,

        #[arg(
            short,
            long,
            value_delimiter = ',',
            help = "Metal columns to average [default: all]"
        )]
        metals: Vec<String>,

        #[arg(short, long, help = "Number of nearest districts [default: from settings, 3]")]
        k: Option<usize>,

        #[arg(
            short,
            long,
            help = "Resolve names from this CSV (name, lat, lon) instead of Nominatim"
        )]
        gazetteer: Option<PathBuf>,

        #[arg(long, value_enum, help = "Neighbor index [default: from settings, ball]")]
        index: Option<IndexStrategy>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Average readings of the districts nearest a coordinate
    Nearest {
        #[arg(short, long, help = "District dataset CSV (district, lat, lon, metal columns)")]
        dataset: PathBuf,

        #[arg(long, allow_hyphen_values = true, help = "Latitude, decimal or DD:MM:SS")]
        lat: String,

        #[arg(long, allow_hyphen_values = true, help = "Longitude, decimal or DD:MM:SS")]
        lon: String,

        #[arg(
            short,
            long,
            value_delimiter = ',',
            help = "Metal columns to average [default: all]"
        )]
        metals: Vec<String>,

        #[arg(short, long, help = "Number of nearest districts [default: from settings, 3]")]
        k: Option<usize>,

        #[arg(long, value_enum, help = "Neighbor index [default: from settings, ball]")]
        index: Option<IndexStrategy>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Summarize a district dataset
    Info {
        #[arg(short, long)]
        dataset: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
