// MediaGit - Git for Media Files
// Copyright (C) 2025 MediaGit Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Progress bars for object transfers

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use lfsfetch_git::{TransferEvent, TransferPhase};
use std::time::Duration;

const OID_DISPLAY_LEN: usize = 10;

/// Creates progress bars on stderr, or hidden ones in quiet mode
pub struct ProgressTracker {
    quiet: bool,
}

impl ProgressTracker {
    /// Create new progress tracker
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Create progress bar for object transfers
    pub fn object_bar(&self, msg: &str, total: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.yellow} {msg} [{bar:40.yellow/blue}] {pos}/{len} ({percent}%)")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Drives one progress bar from a store's [`TransferEvent`]s
pub struct TransferProgress<'a> {
    tracker: &'a ProgressTracker,
    message: String,
    bar: Option<ProgressBar>,
}

impl<'a> TransferProgress<'a> {
    /// Nothing is drawn until the transfer starts
    pub fn new(tracker: &'a ProgressTracker, message: &str) -> Self {
        Self {
            tracker,
            message: message.to_string(),
            bar: None,
        }
    }

    /// Apply one event
    pub fn handle(&mut self, event: &TransferEvent) {
        match event.phase {
            TransferPhase::Started => {
                self.bar = Some(self.tracker.object_bar(&self.message, event.total));
            }
            TransferPhase::Object => {
                if let Some(bar) = &self.bar {
                    bar.set_position(event.completed);
                    if let Some(oid) = &event.oid {
                        let short: String = oid.chars().take(OID_DISPLAY_LEN).collect();
                        bar.set_message(format!("{} {}", self.message, short));
                    }
                }
            }
            TransferPhase::Finished => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    /// Position of the active bar, if a transfer is running
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drive_bar() {
        let tracker = ProgressTracker::new(true);
        let mut progress = TransferProgress::new(&tracker, "Downloading");
        assert_eq!(progress.position(), None);

        progress.handle(&TransferEvent::new(TransferPhase::Started, 0, 2));
        assert_eq!(progress.position(), Some(0));

        progress.handle(&TransferEvent::new(TransferPhase::Object, 1, 2).with_oid("abcdef0123456789"));
        assert_eq!(progress.position(), Some(1));

        progress.handle(&TransferEvent::new(TransferPhase::Finished, 2, 2));
        assert_eq!(progress.position(), None);
    }

    #[test]
    fn test_non_ascii_oid_is_shortened_by_chars() {
        let tracker = ProgressTracker::new(true);
        let mut progress = TransferProgress::new(&tracker, "Downloading");
        progress.handle(&TransferEvent::new(TransferPhase::Started, 0, 1));
        progress.handle(&TransferEvent::new(TransferPhase::Object, 1, 1).with_oid("aéééééééééé"));
        assert_eq!(progress.position(), Some(1));
    }

    #[test]
    fn test_object_before_start_is_ignored() {
        let tracker = ProgressTracker::new(true);
        let mut progress = TransferProgress::new(&tracker, "Downloading");
        progress.handle(&TransferEvent::new(TransferPhase::Object, 1, 1).with_oid("ab"));
        assert_eq!(progress.position(), None);
    }
}
