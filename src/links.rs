use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Load profile URLs from a file with one URL (or bare domain) per line.
///
/// Lines are trimmed and surrounding double quotes stripped; lines that are
/// empty after trimming are skipped.
pub fn load_links(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read link file {}", path.display()))?;

    let links: Vec<String> = text
        .lines()
        .map(|line| line.trim().trim_matches('"'))
        .filter(|line| !line.is_empty())
        .map(normalize_url)
        .collect();

    info!("Loaded {} profile URLs from {}", links.len(), path.display());
    Ok(links)
}

/// Prefix entries lacking a scheme with https://.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_domain_gains_scheme() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
    }

    #[test]
    fn existing_scheme_is_untouched() {
        assert_eq!(normalize_url("https://x.com/rustlang"), "https://x.com/rustlang");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
    }

    #[test]
    fn load_strips_quotes_and_skips_blank_lines() {
        let path = std::env::temp_dir().join("twitter_scraper_links_test.txt");
        std::fs::write(&path, "\"example.com\"\n\nhttps://x.com/rustlang\n   \nbar.org  \n")
            .unwrap();

        let links = load_links(&path).unwrap();
        assert_eq!(
            links,
            vec!["https://example.com", "https://x.com/rustlang", "https://bar.org"]
        );
    }
}
