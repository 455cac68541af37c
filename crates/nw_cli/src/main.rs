use clap::Parser;
use nw_core::{ArticleStore, Result, SentimentModel, SummaryModel, SummaryStatus};
use nw_pipeline::{BackoffPolicy, SentimentEnricher, SummarizationPipeline, SummaryConfig};
use nw_scrappers::{builtin_profiles, find_profile, ScrapeRunner, SelectorProfile};
use std::str::FromStr;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{info, warn};

/// Duration in `1h30m`-style notation; a bare number means seconds.
#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut digits = String::new();
        let mut parsed_any = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if let Ok(num) = digits.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    'd' => total_seconds += num * 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                digits.clear();
                parsed_any = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number means seconds.
        if !digits.is_empty() {
            total_seconds += digits.parse::<u64>().map_err(|_| "Invalid number in duration".to_string())?;
            parsed_any = true;
        }
        if !parsed_any {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend: memory or sqlite
    #[arg(long, default_value = "sqlite")]
    storage: String,
    /// Database file for the sqlite backend
    #[arg(long, default_value = "articles.db")]
    db_path: String,
    /// Summarization model: dummy or bart
    #[arg(long, default_value = "dummy")]
    model: String,
    /// Endpoint for the hosted model
    #[arg(long)]
    model_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the summarization pipeline until the store is drained
    Summarize {
        #[arg(long, default_value_t = 16)]
        batch_size: usize,
        #[arg(long, default_value_t = 1024)]
        chunk_size: usize,
        #[arg(long, default_value_t = 600)]
        max_length: usize,
        #[arg(long, default_value_t = 50)]
        min_length: usize,
        #[arg(long, default_value_t = 3)]
        retry_attempts: u32,
        #[arg(long, default_value_t = 4)]
        beam_count: usize,
        #[arg(long, default_value_t = 1.0)]
        temperature: f64,
        /// Enable sampling instead of deterministic decoding
        #[arg(long)]
        sampling: bool,
        /// Retry backoff policy
        #[arg(long, value_enum, default_value = "fixed")]
        backoff: BackoffKind,
    },
    /// Score article sentiment until the store has no unscored articles
    Sentiment {
        #[arg(long, default_value_t = 16)]
        batch_size: usize,
        /// Sentiment model: lexicon or sst
        #[arg(long, default_value = "lexicon")]
        sentiment_model: String,
    },
    /// Scrape one source by name, or all built-in sources
    Scrape {
        source: Option<String>,
        /// Re-scrape periodically at this interval (e.g. 1h, 30m, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// List built-in sources
    Sources,
    /// Serve the read-only article API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackoffKind {
    Fixed,
    Exponential,
}

impl From<BackoffKind> for BackoffPolicy {
    fn from(kind: BackoffKind) -> Self {
        match kind {
            BackoffKind::Fixed => BackoffPolicy::Fixed(Duration::from_secs(1)),
            BackoffKind::Exponential => BackoffPolicy::Exponential {
                base: Duration::from_secs(1),
                max: Duration::from_secs(30),
            },
        }
    }
}

async fn scrape_once(runner: &ScrapeRunner, profile: Option<&SelectorProfile>) -> Result<usize> {
    match profile {
        Some(profile) => runner.scrape_source(profile).await,
        None => runner.scrape_all(&builtin_profiles()).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let store = nw_storage::create_store(&cli.storage, Some(&cli.db_path)).await?;
    info!("Storage initialized (using {})", cli.storage);

    match cli.command {
        Commands::Summarize {
            batch_size,
            chunk_size,
            max_length,
            min_length,
            retry_attempts,
            beam_count,
            temperature,
            sampling,
            backoff,
        } => {
            let model = nw_inference::create_model(&cli.model, cli.model_url.as_deref())?;
            info!("Summarization model initialized (using {})", model.name());

            let config = SummaryConfig {
                max_length,
                min_length,
                sampling,
                beam_count,
                temperature,
                batch_size,
                retry_attempts,
                chunk_size,
                backoff: backoff.into(),
            };
            let pipeline = SummarizationPipeline::new(store.clone(), model, config);

            let shutdown = pipeline.shutdown_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, finishing current batch");
                    shutdown.store(true, Ordering::SeqCst);
                }
            });

            let report = pipeline.run().await?;
            info!(
                "Done: {} articles in {} batches ({:.2} articles/s)",
                report.total_processed,
                report.batches,
                report.rate(),
            );
            info!(
                "Store now holds {} summarized, {} failed, {} pending",
                store.count_by_status(SummaryStatus::Success).await?,
                store.count_by_status(SummaryStatus::Failed).await?,
                store.count_by_status(SummaryStatus::Pending).await?,
            );
        }
        Commands::Sentiment { batch_size, sentiment_model } => {
            let model = nw_inference::create_sentiment_model(
                &sentiment_model,
                cli.model_url.as_deref(),
            )?;
            info!("Sentiment model initialized (using {})", model.name());

            let enricher = SentimentEnricher::new(store.clone(), model, batch_size);
            let shutdown = enricher.shutdown_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, finishing current batch");
                    shutdown.store(true, Ordering::SeqCst);
                }
            });

            let report = enricher.run().await?;
            info!(
                "Done: {} articles scored in {} batches",
                report.total_processed, report.batches,
            );
        }
        Commands::Scrape { source, interval } => {
            let runner = ScrapeRunner::new(store.clone());
            let profile = match &source {
                Some(name) => Some(find_profile(name).ok_or_else(|| {
                    nw_core::Error::Scraping(format!("Unknown source: {}", name))
                })?),
                None => None,
            };

            if let Some(interval) = interval {
                info!("Running in periodic mode with {}s interval", interval.0.as_secs());
                loop {
                    match scrape_once(&runner, profile.as_ref()).await {
                        Ok(stored) => info!("Scrape cycle finished, {} new articles stored", stored),
                        Err(e) => warn!("Scrape cycle failed: {}", e),
                    }
                    info!("Waiting {}s before next scrape", interval.0.as_secs());
                    tokio::time::sleep(interval.0).await;
                }
            } else {
                let stored = scrape_once(&runner, profile.as_ref()).await?;
                info!("Scrape finished, {} new articles stored", stored);
            }
        }
        Commands::Sources => {
            for profile in builtin_profiles() {
                println!("{:<12} {} ({})", profile.cli_name, profile.name, profile.base_url);
            }
        }
        Commands::Serve { addr } => {
            info!("Serving article API on {}", addr);
            nw_web::serve(&addr, nw_web::AppState { store }).await?;
        }
    }

    Ok(())
}
