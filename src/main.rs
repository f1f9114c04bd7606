use anyhow::Result;
use bf_visualize::{Config, render_all};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

fn main() -> Result<()> {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::parse();
    render_all(&config)?;
    Ok(())
}
