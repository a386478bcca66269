/// wirecg Terminal Viewer - Spinning wireframe scene
///
/// Controls:
///   - 1 / 2: Orthographic / perspective projection
///   - A: Toggle auto-spin
///   - W/S/D / Arrow Keys: Rotate the model
///   - E/R: Roll rotation
///   - G/C/L: Toggle grid / curve / L-system
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::fmt::writer as tsfw;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wirecg_core::{Scene, SceneConfig};
use wirecg_terminal::TerminalApp;

#[derive(Parser)]
#[command(version, about = "Spinning wireframe scene in the terminal")]
struct Cli {
    /// TOML scene description; defaults are used for anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The log file to write to
    ///
    /// The terminal is the render surface, so nothing is logged without one.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Start in orthographic projection
    #[arg(long)]
    orthographic: bool,
    /// Start with auto-spin disabled
    #[arg(long)]
    no_spin: bool,
}

struct Writer(Option<File>);
impl<'a> tsfw::MakeWriter<'a> for Writer {
    type Writer = tsfw::OptionalWriter<&'a File>;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .as_ref()
            .map_or_else(tsfw::OptionalWriter::none, tsfw::OptionalWriter::some)
    }
}

fn load_config(args: &Cli) -> anyhow::Result<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let config = SceneConfig::from_toml_str(&text)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            info!(path = %path.display(), "loaded config file");
            config
        }
        None => SceneConfig::default(),
    };

    if args.orthographic {
        config.projection.mode = wirecg_core::ProjectionMode::Orthographic;
    }
    if args.no_spin {
        config.model.auto_spin = false;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let log_file = args
        .log_file
        .as_ref()
        .map(|path| {
            File::options()
                .append(true)
                .create(true)
                .open(path)
                .with_context(|| format!("failed to open log file at {}", path.display()))
        })
        .transpose()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Writer(log_file)),
        )
        .init();

    let config = load_config(&args)?;
    let mut app = TerminalApp::new(Scene::new(config), args.fps)
        .context("failed to query terminal size")?;
    app.run().context("terminal viewer failed")?;

    info!("terminal viewer exited");
    Ok(())
}
