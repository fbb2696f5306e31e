mod config;
mod db;
mod extract;
mod links;
mod scraper;
mod session;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::session::BrowserSession;

#[derive(Parser)]
#[command(name = "twitter_scraper", about = "Twitter profile scraper via a driven browser")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, default_value = "data/profiles.sqlite")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Visit each profile URL in FILE and save the extracted fields
    Run {
        /// File with one profile URL (or bare domain) per line
        #[arg(default_value = "twitter_links.csv")]
        file: PathBuf,
        /// Max profiles to visit (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Seconds to wait for the profile marker before skipping a page
        #[arg(long, default_value_t = config::DEFAULT_WAIT_SECS)]
        timeout: u64,
        /// Seconds to pause between visits
        #[arg(long, default_value_t = config::DEFAULT_DELAY_SECS)]
        delay: u64,
        /// Run the browser with a visible window
        #[arg(long)]
        headful: bool,
    },
    /// Show row counts for the profile store
    Stats,
    /// Stored profiles as a compact table
    Overview {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            limit,
            timeout,
            delay,
            headful,
        } => {
            let cfg = Config::new(cli.db, timeout, delay, !headful);
            let conn = db::connect(&cfg.db_path)?;
            db::init_schema(&conn)?;

            let mut urls = links::load_links(&file)?;
            if let Some(n) = limit {
                urls.truncate(n);
            }
            if urls.is_empty() {
                println!("No profile URLs in {}.", file.display());
                return Ok(());
            }

            println!("Visiting {} profiles...", urls.len());
            let session = BrowserSession::launch(cfg.headless).await?;
            let outcome = scraper::run(&conn, &session, &cfg, urls).await;
            if let Err(e) = session.quit().await {
                tracing::warn!("Browser shutdown failed: {}", e);
            }

            let stats = outcome?;
            println!(
                "Done: {} visited ({} saved, {} skipped).",
                stats.total, stats.saved, stats.skipped
            );
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Profiles:      {}", s.total);
            println!("With bio:      {}", s.with_bio);
            println!("With location: {}", s.with_location);
            println!("With website:  {}", s.with_website);
            Ok(())
        }
        Commands::Overview { limit } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_profiles(&conn, limit)?;
            if rows.is_empty() {
                println!("No profiles stored yet.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<36} | {:>9} | {:>9} | {:<18} | {:<28}",
                "#", "URL", "Followers", "Following", "Location", "Website"
            );
            println!("{}", "-".repeat(116));

            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:<36} | {:>9} | {:>9} | {:<18} | {:<28}",
                    i + 1,
                    truncate(&r.url, 36),
                    truncate(&r.follower_count, 9),
                    truncate(&r.following_count, 9),
                    truncate(&r.location, 18),
                    truncate(&r.website, 28),
                );
            }

            // Bio text in a separate section to avoid clutter
            let with_bio: Vec<_> = rows.iter().filter(|r| !r.bio.is_empty()).collect();
            if !with_bio.is_empty() {
                println!("\n--- Bios ---");
                for r in &with_bio {
                    println!("  {}: {}", truncate(&r.url, 36), truncate(&r.bio, 70));
                }
            }

            println!("\n{} profiles", rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
