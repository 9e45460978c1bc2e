//! mdcast - publish one markdown article everywhere

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use libmdcast::config::find_config_file;
use libmdcast::logging::{self, LogFormat, LoggingConfig};
use libmdcast::{
    create_platforms, Config, MarkdownSource, MdcastError, PlatformKind, Post, Publisher, Result,
};
use libmdcast::error::PlatformError;

#[derive(Parser, Debug)]
#[command(name = "mdcast")]
#[command(about = "Publish a markdown article to dev.to, Hashnode, and Medium", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish an article to the configured platforms
    Post {
        /// Path to the markdown article
        path: PathBuf,

        /// Target platform(s) (default: all)
        #[arg(short, long, value_delimiter = ',', num_args = 1..)]
        platforms: Vec<PlatformKind>,

        /// Run every transformation but make no network calls
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a scaffold mdcast.toml
    Init {
        /// Directory to write the config into (default: current directory)
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        LoggingConfig::new(LogFormat::Text, "debug".to_string(), true).init();
    } else {
        logging::init_default();
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { cwd } => init(cwd),
        Commands::Post {
            path,
            platforms,
            dry_run,
        } => post(&path, &platforms, dry_run).await,
    }
}

fn init(cwd: Option<PathBuf>) -> Result<()> {
    let cwd = match cwd {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(|e| {
            MdcastError::InvalidInput(format!("Cannot determine working directory: {e}"))
        })?,
    };

    if let Some(existing) = find_config_file(&cwd) {
        println!("Configuration already exists: {}", existing.display());
        return Ok(());
    }

    let path = Config::write_scaffold(&cwd)?;
    println!("Wrote {}", path.display());
    println!("Edit it, then publish with: mdcast post <article.md>");
    Ok(())
}

async fn post(path: &Path, requested: &[PlatformKind], dry_run: bool) -> Result<()> {
    check_extension(path)?;

    let config = Config::load()?;

    let kinds: Vec<PlatformKind> = if requested.is_empty() {
        PlatformKind::ALL.to_vec()
    } else {
        requested.to_vec()
    };
    let platforms = create_platforms(&config, &kinds)?;

    let source = MarkdownSource::load(path, &config.markdown)?;
    let article = Post::assemble(&source, &config.markdown)?;

    let publisher = Publisher::new(platforms);
    let outcomes = publisher.publish_all(&article, dry_run).await;

    let mut failed = 0usize;
    for outcome in &outcomes {
        if outcome.success {
            match (&outcome.reference, dry_run) {
                (Some(reference), _) => println!("{}: published {}", outcome.platform, reference),
                (None, true) => println!("{}: ok (dry run)", outcome.platform),
                (None, false) => println!("{}: published", outcome.platform),
            }
        } else {
            failed += 1;
            println!(
                "{}: failed: {}",
                outcome.platform,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if failed > 0 {
        return Err(PlatformError::Api(format!(
            "{failed} of {} platforms failed",
            outcomes.len()
        ))
        .into());
    }

    Ok(())
}

/// Only markdown files are accepted; anything else is refused before
/// the config is even loaded
fn check_extension(path: &Path) -> Result<()> {
    let ok = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            ext == "md" || ext == "markdown"
        });

    if ok {
        Ok(())
    } else {
        Err(MdcastError::InvalidInput(format!(
            "Not a markdown file: {} (expected a .md or .markdown extension)",
            path.display()
        )))
    }
}
