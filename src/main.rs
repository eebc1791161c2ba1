//! softrender command line
//!
//! Renders an OBJ model (or the built-in cube) to an image file.
//! Settings come from an optional RON config; flags override it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use softrender::app::{run, MeshSource};
use softrender::config::{load_config, RenderConfig};
use softrender::rasterizer::ShadingMode;
use softrender::VERSION;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Wireframe,
    Flat,
    Textured,
}

impl From<Mode> for ShadingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Wireframe => ShadingMode::Wireframe,
            Mode::Flat => ShadingMode::Flat,
            Mode::Textured => ShadingMode::Textured,
        }
    }
}

#[derive(Parser)]
#[command(name = "softrender")]
#[command(version = VERSION)]
#[command(about = "Software rasterizer: OBJ meshes to images, no GPU")]
struct Cli {
    /// RON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OBJ model to render
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Diffuse texture (PNG, JPEG, BMP or TGA)
    #[arg(short, long)]
    texture: Option<PathBuf>,

    /// Shading mode
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Output image; format follows the extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render the built-in cube instead of a model file
    #[arg(long)]
    demo: bool,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

impl Cli {
    /// Fold command-line overrides into the loaded config
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if let Some(texture) = &self.texture {
            config.texture = Some(texture.clone());
        }
        if let Some(mode) = self.mode {
            config.raster.shading = mode.into();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
    }
}

fn init_logging(level: Option<LogLevel>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level.into());
    }
    builder.init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => RenderConfig::default(),
    };
    cli.apply(&mut config);

    let source = match (&config.model, cli.demo) {
        (_, true) => MeshSource::Demo,
        (Some(path), false) => MeshSource::File(path.clone()),
        (None, false) => {
            log::error!("No model given; pass --model, set `model` in the config, or use --demo");
            return ExitCode::FAILURE;
        }
    };

    log::info!("=== softrender v{} ===", VERSION);
    match run(&config, &source) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
