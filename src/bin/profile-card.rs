use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use profile_card::{LocalAssetLoader, ProfileCard, RenderOptions, UserProfile};
use tracing_subscriber::EnvFilter;

/// Render a profile card PNG from JSON inputs.
///
/// Image references in the inputs must be local paths or base64 data; URLs
/// are not fetched.
#[derive(Parser, Debug)]
#[command(name = "profile-card", version)]
struct Cli {
    /// User profile JSON.
    #[arg(long)]
    profile: PathBuf,

    /// Render options JSON. Defaults are used when omitted.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print the effective options as JSON before rendering.
    #[arg(long)]
    dump_options: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let profile = UserProfile::from_json(&read(&cli.profile)?)
        .map_err(|e| format!("parse profile '{}': {e}", cli.profile.display()))?;
    let options = match &cli.options {
        Some(path) => RenderOptions::from_json(&read(path)?)
            .map_err(|e| format!("parse options '{}': {e}", path.display()))?,
        None => RenderOptions::default(),
    };
    if cli.dump_options {
        println!("{}", options.to_json_pretty()?);
    }

    let card = ProfileCard::new(LocalAssetLoader);
    let png = card.render_png(&profile, &options)?;
    fs::write(&cli.out, png).map_err(|e| format!("write '{}': {e}", cli.out.display()))?;

    tracing::info!(out = %cli.out.display(), "wrote profile card");
    Ok(())
}

fn read(path: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(path).map_err(|e| format!("read '{}': {e}", path.display()).into())
}
