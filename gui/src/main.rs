// SPDX-License-Identifier: MIT OR Apache-2.0
use self::rt::RuntimeError;
use self::settings::{Settings, SettingsError};
use clap::Parser;
use erdp::ErrorDisplay;
use graphics::{GraphicsError, Platform, QueuePolicy, Vulkan};
use ::log::{LevelFilter, error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

mod log;
mod rt;
mod settings;

fn main() -> ExitCode {
    let args = ProgramArgs::parse();

    // Setup logger.
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Err(e) = self::log::init(level, args.log.as_deref()) {
        eprintln!("{}", e.display());
        return ExitCode::FAILURE;
    }

    // Run.
    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e.display());
            ::log::logger().flush();
            ExitCode::FAILURE
        }
    }
}

fn run(args: ProgramArgs) -> Result<(), ProgramError> {
    // Load settings.
    let settings = if args.use_default_settings {
        Settings::default()
    } else {
        Settings::load(&args.settings).map_err(|e| ProgramError::LoadSettings(args.settings, e))?
    };

    // Command line take precedence over settings.
    let mut config = settings.to_config().map_err(ProgramError::InvalidSettings)?;
    let platform = args.platform.or(settings.platform());

    if let Some(v) = platform {
        config.platform = v;
    }

    if args.require_graphics_queue {
        config.queue_policy = QueuePolicy::Required;
    }

    // Bootstrap without window.
    if args.headless {
        let vulkan = Vulkan::new(&config).map_err(ProgramError::Bootstrap)?;

        info!(
            "Bootstrap completed on {} for {}.",
            vulkan.device().name(),
            vulkan.platform()
        );

        vulkan.shutdown();

        return Ok(());
    }

    self::rt::run(config, platform.is_none()).map_err(ProgramError::Runtime)
}

/// Program arguments parsed from command line.
#[derive(Debug, Parser)]
#[command(about = "Bootstrap a Vulkan instance and select a GPU")]
struct ProgramArgs {
    /// Path to the settings file.
    #[arg(long, value_name = "PATH", default_value = "qubit.yml")]
    settings: PathBuf,

    /// Ignore saved settings and use default values instead.
    #[arg(long)]
    use_default_settings: bool,

    /// Windowing system to require presentation extensions for instead of detecting it.
    #[arg(long, value_enum)]
    platform: Option<Platform>,

    /// Bootstrap without creating a window then exit.
    #[arg(long)]
    headless: bool,

    /// Fail if the selected GPU has no queue family with more than one graphics queue.
    #[arg(long)]
    require_graphics_queue: bool,

    /// Also write logs to the specified file.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Enable debug logs.
    #[arg(long, short)]
    verbose: bool,
}

/// Represents an error when our program fails.
#[derive(Debug, Error)]
enum ProgramError {
    #[error("couldn't load settings from {0}")]
    LoadSettings(PathBuf, #[source] SettingsError),

    #[error("invalid settings")]
    InvalidSettings(#[source] SettingsError),

    #[error("couldn't bootstrap Vulkan")]
    Bootstrap(#[source] GraphicsError),

    #[error("couldn't run main window")]
    Runtime(#[source] RuntimeError),
}
