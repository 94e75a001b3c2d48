use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use spiro_editor::config::{ConfigError, EditorConfig};
use spiro_editor::engine::EngineCore;
use spiro_editor::file::{self, FileError};
use spiro_editor::represent::PolylineRepresenter;
use spiro_editor::script::ScriptError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("script: {0}")]
    Script(#[from] ScriptError),
    #[error("drawing: {0}")]
    File(#[from] FileError),
}

#[derive(Parser, Debug)]
#[command(name = "spiro-editor", about = "Build and export spiro path drawings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a shape script into a new drawing.
    Run {
        script: PathBuf,
        /// Write the drawing as JSON here. Printed to stdout when neither output is given.
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the drawing as SVG here.
        #[arg(long)]
        svg: Option<PathBuf>,
        #[arg(long, env = "SPIRO_WIDTH")]
        width: Option<f64>,
        #[arg(long, env = "SPIRO_HEIGHT")]
        height: Option<f64>,
    },
    /// Export a saved JSON drawing as SVG.
    Svg { drawing: PathBuf, output: PathBuf },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = EditorConfig::from_env()?;

    match cli.command {
        Command::Run { script, json, svg, width, height } => {
            config.width = width.unwrap_or(config.width);
            config.height = height.unwrap_or(config.height);
            run_script(&config, &script, json.as_deref(), svg.as_deref())
        }
        Command::Svg { drawing, output } => export_svg(&config, &drawing, &output),
    }
}

fn run_script(config: &EditorConfig, script: &Path, json: Option<&Path>, svg: Option<&Path>) -> Result<(), CliError> {
    let text = fs::read_to_string(script).map_err(|source| CliError::Io { path: script.to_path_buf(), source })?;

    let mut core = EngineCore::with_config(config, Box::new(PolylineRepresenter));
    core.execute_script(&text)?;
    tracing::info!(shapes = core.shapes().len(), "script executed");

    let drawing = core.export_drawing();
    if let Some(path) = json {
        file::write_drawing(path, &drawing)?;
    }
    if let Some(path) = svg {
        write_text(path, &core.export_svg())?;
    }
    if json.is_none() && svg.is_none() {
        println!("{}", file::to_json(&drawing)?);
    }
    Ok(())
}

fn export_svg(config: &EditorConfig, drawing: &Path, output: &Path) -> Result<(), CliError> {
    let mut core = EngineCore::with_config(config, Box::new(PolylineRepresenter));
    core.load_drawing(file::read_drawing(drawing)?);
    write_text(output, &core.export_svg())?;
    tracing::info!(output = %output.display(), shapes = core.shapes().len(), "svg exported");
    Ok(())
}

fn write_text(path: &Path, text: &str) -> Result<(), CliError> {
    fs::write(path, text).map_err(|source| CliError::Io { path: path.to_path_buf(), source })
}
