mod args;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use crate::args::Args;

fn run(args: Args) -> anyhow::Result<()> {
    if args.list_cameras {
        let cameras = camwin_camera::list_cameras().context("failed to list cameras")?;
        for (index, name) in cameras {
            println!("{index:<5} | {name}");
        }
        return Ok(());
    }

    let (mut config, config_path) =
        camwin_backend::config::load_config(args.config.as_deref())
            .context("failed to load config")?;
    args.apply(&mut config);
    camwin_backend::config::normalize(&mut config);

    if args.save_config {
        camwin_backend::config::save_config(&config, &config_path)
            .context("failed to save config")?;
    }

    if args.status {
        println!("System Status:");
        println!("{}", "=".repeat(50));
        println!("{}", camwin_backend::status(&config));
        return Ok(());
    }

    let reason = camwin_backend::run(&config).context("failed to initialize caption engine")?;
    log::info!("Stopped: {reason}");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    simple_logger::SimpleLogger::new()
        .with_level(args.log_level)
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .expect("failed to build logger instance");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
