//! Download the LFS objects referenced by one or more revisions.
//!
//! Objects already in local storage are skipped; when nothing is missing no
//! endpoint is contacted at all.

use crate::output;
use crate::progress::{ProgressTracker, TransferProgress};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::HumanBytes;
use lfsfetch_git::endpoint::DEFAULT_REMOTE;
use lfsfetch_git::{fetch, FetchRequest, FetchSummary, GitRepository, Repository, TransferEvent};
use lfsfetch_storage::LocalStorage;
use std::path::Path;
use tracing::debug;

/// Fetch Git LFS objects for the given revisions
///
/// Scans each revision's tree for files marked `filter=lfs`, collects the
/// pointers not yet present in local storage and downloads them from the
/// remote's LFS endpoint.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    # Fetch objects for HEAD from origin
    lfsfetch fetch

    # Fetch from another remote
    lfsfetch fetch upstream

    # Fetch objects referenced by several revisions
    lfsfetch fetch origin main v1.0

    # Use an endpoint that is not a configured remote
    lfsfetch fetch /srv/mirror/project.git")]
pub struct FetchCmd {
    /// Remote name, or an endpoint URL when no such remote exists
    #[arg(value_name = "REMOTE", default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// Revisions to scan (defaults to HEAD)
    #[arg(value_name = "REFS")]
    pub refs: Vec<String>,

    /// Print a JSON summary instead of human-readable output
    #[arg(long)]
    pub json: bool,
}

impl FetchCmd {
    /// Run against the repository containing `repo_path`
    pub fn execute(&self, repo_path: &Path, quiet: bool) -> Result<()> {
        let repo = GitRepository::discover(repo_path)
            .with_context(|| format!("Not a git repository: {}", repo_path.display()))?;
        let storage = {
            let config = repo.config(None)?;
            LocalStorage::for_repository(repo.git_dir(), &*config)?
        };
        debug!(storage = %storage.root().display(), "Opened repository");

        let request = FetchRequest::new()
            .with_remote(self.remote.as_str())
            .with_revisions(self.refs.iter().cloned());

        let tracker = ProgressTracker::new(quiet || self.json);
        let mut progress = TransferProgress::new(&tracker, "Downloading LFS objects");
        let mut on_event = |event: &TransferEvent| progress.handle(event);
        let summary = fetch(&repo, &storage, &request, Some(&mut on_event))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else if !quiet {
            report(&summary);
        }
        Ok(())
    }
}

fn report(summary: &FetchSummary) {
    if summary.objects == 0 {
        output::info("All LFS objects are already present");
        return;
    }
    output::success(&format!(
        "Fetched {} LFS object{} ({})",
        summary.objects,
        if summary.objects == 1 { "" } else { "s" },
        HumanBytes(summary.bytes)
    ));
    if let Some(endpoint) = &summary.endpoint {
        output::detail("From", endpoint);
    }
    output::detail("Revisions", &summary.revisions.join(", "));
}
