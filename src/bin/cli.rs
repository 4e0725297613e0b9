//! stockwatch CLI
//!
//! Runs the restock watcher, or one-off checks against the configured products.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stockwatch::{
    error::{AppError, Result},
    models::Config,
    pipeline::Watcher,
    services::{self, HttpFetcher, PageFetcher, SmtpNotifier},
};

/// stockwatch - Product Restock Watcher
#[derive(Parser, Debug)]
#[command(
    name = "stockwatch",
    version,
    about = "Polls product pages and emails when they are back in stock"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll all products forever within the active window
    Watch,

    /// Run a single cycle now and exit
    Check {
        /// Run even when outside the active window
        #[arg(long)]
        ignore_window: bool,
    },

    /// Classify one page without sending mail
    Classify {
        /// Product page URL to fetch
        #[arg(required_unless_present = "file")]
        url: Option<String>,

        /// Read HTML from a local file instead
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
    },

    /// List tracked products in check order
    Products,

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .target(env_logger::Target::Stdout)
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load {}: {}", cli.config.display(), e);
            return Err(e);
        }
    };
    config.apply_env_overrides();
    log::debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Command::Watch => {
            config.validate()?;
            config.validate_mail()?;

            let fetcher = HttpFetcher::new(&config.fetcher)?;
            let notifier = SmtpNotifier::new(&config.mail)?;
            log::info!("stockwatch starting...");
            Watcher::new(&config, &fetcher, &notifier).run().await;
        }

        Command::Check { ignore_window } => {
            config.validate()?;
            config.validate_mail()?;

            let fetcher = HttpFetcher::new(&config.fetcher)?;
            let notifier = SmtpNotifier::new(&config.mail)?;
            let mut watcher = Watcher::new(&config, &fetcher, &notifier);
            if ignore_window {
                watcher.run_cycle_now().await;
            } else {
                watcher.tick(chrono::Local::now().time()).await;
            }
        }

        Command::Classify { url, file } => {
            let (label, html) = match (url, file) {
                (_, Some(path)) => {
                    let html = tokio::fs::read_to_string(&path).await?;
                    (path.display().to_string(), html)
                }
                (Some(url), None) => {
                    let fetcher = HttpFetcher::new(&config.fetcher)?;
                    let html = fetcher.fetch(&url).await?;
                    (url, html)
                }
                (None, None) => return Err(AppError::config("Give a URL or --file")),
            };

            let assessment = services::assess(&html);
            log::info!(
                "{}: {} ({})",
                label,
                assessment.verdict,
                assessment.reason.describe()
            );
        }

        Command::Products => {
            for (i, product) in config.products.iter().enumerate() {
                log::info!("{:>2}. {} - {}", i + 1, product.name, product.url);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} products, every {}s, active {})",
                config.products.len(),
                config.schedule.interval_secs,
                config.schedule.window()
            );

            match config.validate_mail() {
                Ok(()) => log::info!(
                    "✓ Mail OK ({}:{} to {} recipients)",
                    config.mail.smtp_host,
                    config.mail.smtp_port,
                    config.mail.recipients.len()
                ),
                Err(e) => {
                    log::error!("Mail validation failed: {}", e);
                    return Err(e);
                }
            }

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
