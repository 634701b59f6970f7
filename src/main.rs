mod logging;

use std::{env, process};

use anyhow::{Context, Result};
use server::{ServerConfig, ServiceContext};
use trainer::TrainerConfig;

fn train(config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => TrainerConfig::from_file(path)
            .with_context(|| format!("failed to read trainer config {path}"))?,
        None => TrainerConfig::default(),
    };

    let report = trainer::run(&config).context("training pipeline failed")?;
    log::info!(
        "{} selected, artifact written to {}",
        report.best.name,
        report.artifact_path.display()
    );
    Ok(())
}

fn serve() -> Result<()> {
    let config = ServerConfig::from_env().context("invalid server environment")?;
    let context = ServiceContext::load(&config.model_path)
        .with_context(|| format!("failed to load {}", config.model_path.display()))?;

    actix_rt::System::new()
        .block_on(server::run(config, context))
        .context("prediction service stopped")
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("wine-quality");

    match args.get(1).map(String::as_str) {
        Some("train") => train(args.get(2).map(String::as_str)),
        Some("serve") => serve(),
        Some(mode) => {
            eprintln!("Unknown mode: {mode}. You must use 'train' or 'serve'.");
            process::exit(1);
        }
        None => {
            eprintln!("Usage: {program} <train [config.json]|serve>");
            process::exit(1);
        }
    }
}
