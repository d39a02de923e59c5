use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use md_to_slack::{Config, Error, Result};

/// Config picked up from the working directory when `--config` is not given.
const LOCAL_CONFIG: &str = ".md-to-slack.toml";

#[derive(Parser)]
#[command(name = "md-to-slack")]
#[command(about = "Convert Markdown to Slack Block Kit JSON")]
struct Cli {
    /// Input Markdown file (reads standard input when omitted or "-")
    input: Option<PathBuf>,

    /// Config file (defaults to .md-to-slack.toml in the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Print the parsed document tree to stderr
    #[arg(long)]
    dump_tree: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(Path::new(LOCAL_CONFIG)),
    };

    let markdown = read_input(cli.input.as_deref())?;

    // Nothing to convert: succeed without output.
    if markdown.trim().is_empty() {
        tracing::debug!("empty input");
        return Ok(());
    }

    if cli.dump_tree {
        let doc = md_to_slack::parse_with_config(&markdown, &config);
        eprint!("{}", doc.dump());
    }

    let json = md_to_slack::markdown_to_json_with_config(&markdown, &config, !cli.compact)?;
    println!("{}", json);
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut markdown = String::new();
            io::stdin()
                .read_to_string(&mut markdown)
                .map_err(Error::Stdin)?;
            Ok(markdown)
        }
    }
}
