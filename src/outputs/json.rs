//! JSON output for a finished digest.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── digest.json
//! ```
//!
//! A second run on the same day overwrites that day's file.

use super::Digest;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Digest`] to `{json_output_dir}/{date}/digest.json`.
///
/// Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_digest(digest: &Digest, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    let full_json_dir = format!("{}/{}", json_output_dir.trim_end_matches('/'), digest.local_date);
    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = ensure_writable_dir(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "JSON directory is not writable");
        return Err(e);
    }

    let path = PathBuf::from(&full_json_dir).join("digest.json");
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = digest.articles.len(), "Wrote digest JSON");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Article, Candidate};

    #[tokio::test]
    async fn test_write_digest_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let digest = Digest {
            local_date: "2025-05-06".to_string(),
            local_time: "08:00:00".to_string(),
            keywords: vec!["space".to_string()],
            articles: vec![Article::from_candidate(
                Candidate {
                    title: "Launch".to_string(),
                    url: "https://example.com/launch".to_string(),
                    ..Candidate::default()
                },
                "Rocket went up.".to_string(),
            )],
        };

        let path = write_digest(&digest, dir).await.unwrap();
        assert!(path.ends_with("2025-05-06/digest.json"));

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: Digest = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, digest);
    }
}
