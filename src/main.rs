use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mdconv::Config;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Html,
    Typst,
    Pdf,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Typst => "typ",
            Format::Pdf => "pdf",
        }
    }
}

#[derive(Parser)]
#[command(name = "mdconv")]
#[command(about = "Convert Markdown files to HTML, Typst or PDF")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output file (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 't', long = "to", value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start the PDF with a table of contents
    #[arg(long)]
    toc: bool,

    /// Log parser decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "mdconv=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::compiled_default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Config::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    if cli.toc {
        config.page.toc = true;
    }
    let markdown = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    info!(input = %cli.input.display(), format = ?cli.format, "converting");

    let bytes = match cli.format {
        Format::Html => mdconv::markdown_to_html_with_config(&markdown, &config).into_bytes(),
        Format::Typst => mdconv::markdown_to_typst_with_config(&markdown, &config).into_bytes(),
        Format::Pdf => {
            let root = match cli.input.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            mdconv::markdown_to_pdf_with_root(&markdown, &config, root)?
        }
    };

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension(cli.format.extension()));
    debug!(bytes = bytes.len(), "writing output");
    fs::write(&output, bytes).with_context(|| format!("writing {}", output.display()))?;

    println!("Created {}", output.display());
    Ok(())
}
