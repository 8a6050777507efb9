use anyhow::Result;
use clap::{Parser, Subcommand};
use job_scout::config::AppConfig;
use job_scout::orchestrator::ScrapeOrchestrator;
use job_scout::scheduler::BackgroundScheduler;
use job_scout::store::JobStore;
use job_scout::types::CandidateProfile;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobscout")]
#[command(about = "Multi-portal job scraping and matching pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Optional TOML configuration overlay
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape all portals once for a candidate profile and print ranked matches
    Scrape {
        /// Comma-separated technical skills, e.g. "react,node.js"
        #[arg(long)]
        skills: String,
        /// Years of experience
        #[arg(long, default_value_t = 0.0)]
        experience: f32,
        #[arg(long, default_value = "pune")]
        city: String,
        #[arg(long, default_value = "india")]
        country: String,
        /// Branch code used for fallback keywords (cse, it, ece, eee, mech, civil)
        #[arg(long, default_value = "cse")]
        branch: String,
        /// Persist ranked matches to the job store
        #[arg(long)]
        save: bool,
    },
    /// Run the periodic background scrape until interrupted
    Schedule,
    /// Initialize the job database
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load(cli.config.as_ref())?);
    config.ensure_directories().await?;

    match cli.command {
        Command::Scrape {
            skills,
            experience,
            city,
            country,
            branch,
            save,
        } => {
            let profile = CandidateProfile {
                technical_skills: skills
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                soft_skills: vec![],
                experience_years: experience,
                city,
                country,
            };

            let orchestrator = ScrapeOrchestrator::new(config.clone());
            let outcome = orchestrator.scrape_all_portals(&profile, &branch).await;
            orchestrator.close_browser().await;

            for summary in &outcome.summaries {
                match &summary.error {
                    Some(error) => info!(
                        "[{}] {} jobs (fallback: {}) - {}",
                        summary.source, summary.returned, summary.fallback_used, error
                    ),
                    None => info!("[{}] {} jobs", summary.source, summary.returned),
                }
            }

            println!("\n{} matching jobs:\n", outcome.jobs.len());
            for job in &outcome.jobs {
                println!(
                    "[{:>3}] {} at {} ({}) - {}",
                    job.match_score,
                    job.record.raw.title,
                    job.record.raw.company,
                    job.record.raw.source,
                    job.reason
                );
                println!("      {}", job.record.raw.url);
            }

            if save {
                let store = JobStore::connect(&config.store.database_path).await?;
                let records: Vec<_> = outcome.jobs.into_iter().map(|j| j.record).collect();
                let report = store.upsert_batch(&records).await?;
                println!(
                    "\nSaved {} new jobs ({} already stored)",
                    report.inserted, report.duplicates
                );
            }
        }

        Command::Schedule => {
            let store = Arc::new(JobStore::connect(&config.store.database_path).await?);
            let orchestrator = Arc::new(ScrapeOrchestrator::new(config.clone()));
            let scheduler = Arc::new(BackgroundScheduler::new(
                orchestrator,
                store,
                &config.scheduler,
            ));

            let runner = scheduler.clone();
            let handle = tokio::spawn(runner.start());

            tokio::signal::ctrl_c().await?;
            info!("Interrupt received, shutting down");
            scheduler.stop();
            handle.await?;
        }

        Command::InitDb => {
            let store = JobStore::connect(&config.store.database_path).await?;
            println!(
                "Database ready at {} ({} jobs stored)",
                config.store.database_path.display(),
                store.count().await?
            );
        }
    }

    Ok(())
}
