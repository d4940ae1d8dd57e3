// src/bin/cli.rs
use color_eyre::eyre::{eyre, Result};
use scrapedesk::{cli, config::AppOptions, logging};

fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = AppOptions::from_env();
    logging::init(&opts.store_dir);

    cli::run(std::env::args().skip(1), opts).map_err(|e| eyre!("{e}"))
}
