//! `roadblock-cli`: validate, convert, and generate roadblock parameter files
//! without the browser editor.


use std::fs;
use std::io::{self, Read};

use canvas::config::EditorConfig;
use canvas::engine::{Action, EngineCore};
use canvas::error::{ConfigError, ImportError};
use canvas::transcode::{self, ExportProfile};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("{0} [{code}]", code = .0.code())]
    Import(#[from] ImportError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("scene is empty; nothing to export")]
    EmptyScene,
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "roadblock-cli", about = "Roadblock layout parameter tool")]
struct Cli {
    /// Canvas width in pixels.
    #[arg(long, global = true, env = "ROADBLOCK_CANVAS_WIDTH")]
    canvas_width: Option<f64>,

    /// Canvas height in pixels.
    #[arg(long, global = true, env = "ROADBLOCK_CANVAS_HEIGHT")]
    canvas_height: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a parameter file.
    Check {
        #[arg(default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Re-center a parameter file on the canvas and print it in a profile.
    Convert {
        #[arg(default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,
    },
    /// Print the decoded items of a parameter file as JSON.
    Inspect {
        #[arg(default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
    /// Print the default layout (one car at canvas center).
    New {
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,
    },
    /// Print the suggested maximum road width for a minimum width.
    MaxWidth { min_width: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Editor,
    Scripting,
}

impl From<ProfileArg> for ExportProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Editor => Self::EDITOR,
            ProfileArg::Scripting => Self::SCRIPTING,
        }
    }
}

fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        // Logging is not up yet.
        if !e.not_found() {
            eprintln!("warning: failed to load .env: {e}");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let output = run(&config, cli.command)?;
    print!("{output}");
    Ok(())
}

/// Environment config with global flag overrides applied.
fn resolve_config(cli: &Cli) -> Result<EditorConfig, CliError> {
    let mut config = EditorConfig::from_env()?;
    if let Some(width) = cli.canvas_width {
        config.canvas.width = positive("--canvas-width", width)?;
    }
    if let Some(height) = cli.canvas_height {
        config.canvas.height = positive("--canvas-height", height)?;
    }
    tracing::debug!(width = config.canvas.width, height = config.canvas.height, "canvas configured");
    Ok(config)
}

fn positive(key: &str, value: f64) -> Result<f64, CliError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { key: key.to_owned() }.into())
    }
}

/// Execute one command and return what it prints on stdout.
fn run(config: &EditorConfig, command: Command) -> Result<String, CliError> {
    match command {
        Command::Check { input, json } => check(&read_input(&input)?, json),
        Command::Convert { input, profile } => convert(config, &read_input(&input)?, profile),
        Command::Inspect { input } => inspect(config, &read_input(&input)?),
        Command::New { profile } => new_layout(config, profile),
        Command::MaxWidth { min_width } => Ok(format!("{}\n", transcode::to_fixed(transcode::max_width(min_width), 2))),
    }
}

fn read_input(input: &str) -> Result<String, CliError> {
    let result = if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(input)
    };
    result.map_err(|source| CliError::Io { path: input.to_owned(), source })
}

fn check(text: &str, as_json: bool) -> Result<String, CliError> {
    match transcode::parse(text) {
        Ok(parts) => {
            if as_json {
                Ok(format!("{}\n", json!({ "ok": true, "parts": parts.len() })))
            } else {
                Ok(format!("ok ({} parts)\n", parts.len()))
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, code = e.code(), "parameter text rejected");
            if as_json {
                let report: Value = json!({ "ok": false, "code": e.code(), "message": e.to_string() });
                println!("{report}");
            }
            Err(e.into())
        }
    }
}

fn convert(config: &EditorConfig, text: &str, profile: Option<ProfileArg>) -> Result<String, CliError> {
    let mut core = EngineCore::new(config.clone());
    let actions = core.import_text(text)?;
    for action in &actions {
        if let Action::Status(notice) = action {
            tracing::info!(level = ?notice.level, "{}", notice.text);
        }
    }
    if let Some(profile) = profile {
        core.config.profile = profile.into();
    }
    core.export_text().ok_or(CliError::EmptyScene)
}

fn inspect(config: &EditorConfig, text: &str) -> Result<String, CliError> {
    let layout = transcode::import(text, &config.footprints, config.canvas, &config.profile)?;
    let report = json!({ "out_of_bounds": layout.out_of_bounds, "items": layout.items });
    Ok(format!("{}\n", serde_json::to_string_pretty(&report)?))
}

fn new_layout(config: &EditorConfig, profile: Option<ProfileArg>) -> Result<String, CliError> {
    let mut core = EngineCore::new(config.clone());
    if let Some(profile) = profile {
        core.config.profile = profile.into();
    }
    core.export_text().ok_or(CliError::EmptyScene)
}
