/// viscomp - visual computing workshop tools.
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod convert;
mod inspect;
mod transform;
mod turntable;
mod view;

#[derive(Parser)]
#[command(name = "viscomp")]
#[command(about = "2D transformation animations and 3D mesh tooling", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate T·R·S transformations of the cat outline into a GIF
    #[command(alias = "t")]
    Transform(transform::TransformArgs),

    /// Print statistics for mesh files and compare them
    #[command(alias = "i")]
    Inspect(inspect::InspectArgs),

    /// Convert a mesh to other formats
    #[command(alias = "c")]
    Convert(convert::ConvertArgs),

    /// Render a rotating view of a mesh into a GIF
    Turntable(turntable::TurntableArgs),

    /// View a mesh in the terminal
    #[command(alias = "v")]
    View(view::ViewArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Transform(args) => transform::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
        Commands::Convert(args) => convert::execute(args),
        Commands::Turntable(args) => turntable::execute(args),
        Commands::View(args) => view::execute(args),
    }
}

/// Log to stderr at `info`, or `debug` with --verbose, unless RUST_LOG says otherwise.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
