mod args;
mod detach;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::Args;

use meteor_core::{
    load_config, resolve, validate_config, Compositor, Decoder, Demodulator, FsStager,
    ImageMagick, Medet, MeteorDemod, PipelineDriver, RunReport,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::from_env();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    validate_config(&config).context("Configuration validation failed")?;

    let tle = args.tle_text();
    let resolution = match resolve(tle.as_deref(), args.sat_id) {
        Ok(resolution) => resolution,
        Err(e) => {
            error!("{}", e);
            Args::command().print_help()?;
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(
        "Post observation {} for sat id {}",
        args.id, resolution.norad_id
    );

    let dispatch = config
        .registry()
        .dispatch(&resolution, config.pipeline.deferred_wait());
    if !dispatch.is_supported() {
        info!("No processing to be done for sat id {}", dispatch.norad_id());
        return Ok(ExitCode::SUCCESS);
    }

    if config.pipeline.detach && !args.foreground && !args.detached {
        let pid = detach::spawn_background().context("Failed to start background process")?;
        info!("Forked into process {}, parent quitting", pid);
        return Ok(ExitCode::SUCCESS);
    }

    let demodulator = MeteorDemod::new(config.demodulator_config());
    let decoder = Medet::new(config.decoder_config());
    let compositor = ImageMagick::new(config.compositor_config());

    if let Err(e) = demodulator.validate().await {
        warn!("{} not ready: {}", demodulator.name(), e);
    }
    if let Err(e) = decoder.validate().await {
        warn!("{} not ready: {}", decoder.name(), e);
    }
    if let Err(e) = compositor.validate().await {
        warn!("{} not ready: {}", compositor.name(), e);
    }

    let stager = FsStager::new(config.layout(), config.stager.clone());
    info!("Data root: {:?}", config.paths.data_root);
    info!("Destination: {:?}", stager.layout().destination_dir);

    let driver = PipelineDriver::new(stager, demodulator, decoder, compositor)
        .with_retention(config.pipeline.retention());

    let report = driver
        .run(args.id, &dispatch)
        .await
        .with_context(|| format!("Processing observation {} failed", args.id))?;

    log_report(&report);
    Ok(ExitCode::SUCCESS)
}

fn log_report(report: &RunReport) {
    match serde_json::to_string(report) {
        Ok(json) => info!("Run report: {}", json),
        Err(e) => warn!("Could not serialize run report: {}", e),
    }
}
