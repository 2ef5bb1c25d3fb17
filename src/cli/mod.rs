// CLI module for the headless inpainting host

use crate::workflow::{Mode, ModelChoice};
use clap::Parser;
use std::path::PathBuf;

/// nanobanana - mask-guided Gemini inpainting from the command line
#[derive(Parser, Debug)]
#[command(name = "nanobanana", version, about, long_about = None)]
pub struct Args {
    /// Base image (PNG)
    #[arg(long, required_unless_present = "print_config")]
    pub base: Option<PathBuf>,

    /// Mask image (PNG); nonzero pixels mark the area to edit
    #[arg(long, required_unless_present = "print_config")]
    pub mask: Option<PathBuf>,

    /// What to put in (replace) or remove from (erase) the masked area
    #[arg(long, short, default_value = "")]
    pub prompt: String,

    /// replace or erase (defaults to the configured mode)
    #[arg(long)]
    pub mode: Option<Mode>,

    /// auto, pro or flash (defaults to the configured model)
    #[arg(long)]
    pub model: Option<ModelChoice>,

    /// Variations to request, clamped to 1..=4
    #[arg(long, short = 'n')]
    pub count: Option<u8>,

    /// Where variation PNGs are written
    #[arg(long, default_value = "nanobanana-out")]
    pub out_dir: PathBuf,

    /// Commit this entry (0 = original, 1.. = variation) and write committed.png
    #[arg(long)]
    pub select: Option<usize>,

    /// Config file (default: ~/.nanobanana/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Gemini API key; overrides the configured one
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}
