use clap::Parser;
use district_metals::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli)
}
