mod clock;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use reltime_engine::{ResolveOptions, Resolver};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "reltime",
    version,
    about = "Resolve relative time phrases (\"in 5 minutes\", \"1 week ago\", \"tomorrow\") into timestamps"
)]
struct Cli {
    /// Phrase to resolve; multiple words are joined with spaces
    #[arg(required = true)]
    phrase: Vec<String>,

    /// Reference instant (RFC 3339, or YYYY-MM-DD HH:MM:SS in --tz) [default: now]
    #[arg(long)]
    at: Option<String>,

    /// IANA time zone used to read the clock and the DST flag
    #[arg(long, default_value = "UTC")]
    tz: String,

    /// JSON file with resolver options (anchor_time, numerals, units)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON object instead of "<timestamp>\t<flag>"
    #[arg(long)]
    json: bool,

    /// Log matching decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("cannot initialise logging: {e}"))
}

fn load_resolver(config: Option<&PathBuf>) -> Result<Resolver> {
    let Some(path) = config else {
        return Ok(Resolver::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read config '{}'", path.display()))?;
    let options: ResolveOptions = serde_json::from_str(&raw)
        .with_context(|| format!("invalid config '{}'", path.display()))?;
    debug!(path = %path.display(), "loaded resolver options");
    Ok(Resolver::new(&options)?)
}

fn run(cli: Cli) -> Result<()> {
    let tz = clock::parse_timezone(&cli.tz)?;
    let reference = clock::reference_instant(cli.at.as_deref(), tz)?;
    let resolver = load_resolver(cli.config.as_ref())?;

    let phrase = cli.phrase.join(" ");
    let resolution = resolver.resolve(&phrase, &reference)?;

    if cli.json {
        println!("{}", serde_json::to_string(&resolution)?);
    } else {
        println!(
            "{}\t{}",
            clock::format_instant(&resolution.instant),
            resolution.flag.code()
        );
    }
    Ok(())
}
