use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{self, ProfileRow};
use crate::extract;
use crate::session::RenderSession;

/// Outcome tally returned after a full pass over the link list.
pub struct RunStats {
    pub total: usize,
    pub saved: usize,
    pub skipped: usize,
}

/// Visit every URL in order: gate on the profile marker, extract, upsert.
/// The pacing delay follows every visit regardless of outcome.
pub async fn run(
    conn: &Connection,
    session: &dyn RenderSession,
    cfg: &Config,
    links: Vec<String>,
) -> Result<RunStats> {
    let total = links.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut saved = 0usize;
    let mut skipped = 0usize;

    for url in &links {
        match visit_profile(session, url, cfg).await? {
            Some(row) => {
                db::upsert_profile(conn, &row)
                    .with_context(|| format!("Failed to save profile for {}", url))?;
                saved += 1;
            }
            None => {
                warn!("Skipping {}: account not found", url);
                skipped += 1;
            }
        }
        pb.inc(1);
        tokio::time::sleep(cfg.request_delay).await;
    }

    pb.finish_and_clear();
    info!("Visited {} profiles ({} saved, {} skipped)", total, saved, skipped);

    Ok(RunStats {
        total,
        saved,
        skipped,
    })
}

/// Load one profile page and build its row, or None when the identity marker
/// never appears within the wait window.
async fn visit_profile(
    session: &dyn RenderSession,
    url: &str,
    cfg: &Config,
) -> Result<Option<ProfileRow>> {
    session.navigate(url).await?;

    if !session
        .wait_for_presence(extract::PROFILE_MARKER, cfg.wait_timeout)
        .await?
    {
        return Ok(None);
    }

    // The marker is enough; cut off slow subresources before reading fields.
    session.stop_loading().await?;

    let fields = extract::extract_fields(session).await?;
    Ok(Some(ProfileRow {
        url: url.to_string(),
        bio: fields.bio,
        follower_count: fields.follower_count,
        following_count: fields.following_count,
        location: fields.location,
        website: fields.website,
    }))
}
