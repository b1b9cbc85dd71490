// ABOUTME: CLI for extracting page text and measuring changes between page versions.
// ABOUTME: Reads files or stdin and prints text, diffs, metrics, sitemap locations, or robots verdicts.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use webtools_page::{
    change_metrics, changes_only, normalize, percent_changed, selected_diff, unified,
};
use webtools_site::{sitemap_locations, RobotsTxt};

/// Extract normalized text from HTML and compare page versions.
#[derive(Parser, Debug)]
#[command(name = "webtools")]
#[command(about = "Extract page text and measure changes between HTML documents", long_about = None)]
struct Args {
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized text of a document or a selected part of it.
    Text {
        /// HTML file path, or "-" for stdin.
        file: String,

        /// CSS selector; the whole document when omitted.
        #[arg(short, long)]
        selector: Option<String>,
    },

    /// Diff the first match of a selector between two documents.
    Diff {
        /// Original HTML file path, or "-" for stdin.
        from: String,

        /// Updated HTML file path.
        to: String,

        /// CSS selector whose first match is compared.
        #[arg(short, long)]
        selector: String,

        /// Only print added and removed lines.
        #[arg(long, default_value_t = false)]
        changes: bool,

        /// Print records as JSON instead of a textual diff.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the percent-changed ratio between two documents.
    Percent {
        /// Original HTML file path, or "-" for stdin.
        from: String,

        /// Updated HTML file path.
        to: String,

        /// CSS selector whose first match is compared.
        #[arg(short, long)]
        selector: String,

        /// Print full change metrics as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the page locations listed in a sitemap, one per line.
    Sitemap {
        /// Sitemap XML file path, or "-" for stdin.
        file: String,
    },

    /// Check URLs against a robots.txt file.
    Robots {
        /// robots.txt file path, or "-" for stdin.
        file: String,

        /// URLs to check.
        #[arg(required = true)]
        urls: Vec<String>,

        /// User agent whose rules apply.
        #[arg(short, long)]
        user_agent: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Text { file, selector } => {
            let html = load_text(&file)?;
            println!("{}", normalize(&html, selector.as_deref()));
        }
        Command::Diff {
            from,
            to,
            selector,
            changes,
            json,
        } => {
            let (from_html, to_html) = load_pair(&from, &to)?;
            let mut records = selected_diff(&from_html, &to_html, &selector);
            if changes {
                records = changes_only(&records);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", unified(&records));
            }
        }
        Command::Percent {
            from,
            to,
            selector,
            json,
        } => {
            let (from_html, to_html) = load_pair(&from, &to)?;
            if json {
                let metrics = change_metrics(&from_html, &to_html, &selector);
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                println!("{}", percent_changed(&from_html, &to_html, &selector));
            }
        }
        Command::Sitemap { file } => {
            let xml = load_text(&file)?;
            for page in sitemap_locations(&xml) {
                println!("{}", page);
            }
        }
        Command::Robots {
            file,
            urls,
            user_agent,
        } => {
            let body = load_text(&file)?;
            let mut robots = RobotsTxt::parse(&body);
            if let Some(agent) = user_agent {
                robots = robots.with_user_agent(agent);
            }
            for url in urls {
                let verdict = if robots.is_url_allowed(&url) {
                    "allowed"
                } else {
                    "disallowed"
                };
                println!("{}\t{}", verdict, url);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_pair(from: &str, to: &str) -> Result<(String, String)> {
    if from == "-" && to == "-" {
        bail!("only one of FROM and TO can be read from stdin");
    }
    Ok((load_text(from)?, load_text(to)?))
}

fn load_text(target: &str) -> Result<String> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(String::from_utf8_lossy(&buf).into_owned());
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    let bytes = fs::read(&path).with_context(|| format!("reading {}", target))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
