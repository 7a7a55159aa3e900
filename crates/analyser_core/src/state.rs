use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::view_model::{AppViewModel, PhaseLabel, SelectedFileView};
use crate::UploadFailure;

pub type SubmissionId = u64;

/// Largest file accepted for upload (10 MiB).
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub const FILE_TOO_LARGE_MESSAGE: &str = "File size exceeds 10MB limit.";
pub const UPLOAD_CANCELLED_MESSAGE: &str = "Upload cancelled.";

/// A file picked by the user. Content is read when the upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Structured analysis returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub arguments_for: Vec<String>,
    pub arguments_against: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight. `notice` holds a rejected selection message.
    Idle { notice: Option<String> },
    Uploading {
        submission_id: SubmissionId,
        percent: u8,
    },
    Succeeded(AnalysisResult),
    Failed { message: String },
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle { notice: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selected: Option<SelectedFile>,
    phase: Phase,
    last_submission: SubmissionId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, Phase::Uploading { .. })
    }

    pub fn view(&self) -> AppViewModel {
        let (label, progress, error, analysis) = match &self.phase {
            Phase::Idle { notice } => (PhaseLabel::Idle, None, notice.clone(), None),
            Phase::Uploading { percent, .. } => (PhaseLabel::Uploading, Some(*percent), None, None),
            Phase::Succeeded(analysis) => {
                (PhaseLabel::Succeeded, None, None, Some(analysis.clone()))
            }
            Phase::Failed { message } => (PhaseLabel::Failed, None, Some(message.clone()), None),
        };
        AppViewModel {
            phase: label,
            selected_file: self.selected.as_ref().map(|file| SelectedFileView {
                name: file.name.clone(),
                size: file.size,
            }),
            submit_enabled: self.selected.is_some() && !self.is_uploading(),
            progress,
            error,
            analysis,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Applies a selection. Returns the abandoned submission, if one was in flight.
    pub(crate) fn select_file(&mut self, candidate: Option<SelectedFile>) -> Option<SubmissionId> {
        let abandoned = self.in_flight();
        match candidate {
            Some(file) if file.size > MAX_FILE_BYTES => {
                self.selected = None;
                self.phase = Phase::Idle {
                    notice: Some(FILE_TOO_LARGE_MESSAGE.to_string()),
                };
            }
            Some(file) => {
                self.selected = Some(file);
                self.clear_error();
            }
            None => {
                self.selected = None;
                self.clear_error();
            }
        }
        if self.is_uploading() {
            self.phase = Phase::Idle { notice: None };
        }
        self.mark_dirty();
        abandoned
    }

    /// Starts a new submission if a file is selected and nothing is in flight.
    pub(crate) fn begin_submission(&mut self) -> Option<(SubmissionId, SelectedFile)> {
        if self.is_uploading() {
            return None;
        }
        let file = self.selected.clone()?;
        self.last_submission += 1;
        self.phase = Phase::Uploading {
            submission_id: self.last_submission,
            percent: 0,
        };
        self.mark_dirty();
        Some((self.last_submission, file))
    }

    pub(crate) fn apply_progress(
        &mut self,
        submission_id: SubmissionId,
        bytes_sent: u64,
        total_bytes: Option<u64>,
    ) {
        let Some(total) = total_bytes.filter(|total| *total > 0) else {
            return;
        };
        if let Phase::Uploading {
            submission_id: current,
            percent,
        } = &mut self.phase
        {
            if *current != submission_id {
                return;
            }
            let next = percent_of(bytes_sent, total);
            if next > *percent {
                *percent = next;
                self.dirty = true;
            }
        }
    }

    /// Records the outcome of the current submission. Returns false for stale events.
    pub(crate) fn apply_finished(
        &mut self,
        submission_id: SubmissionId,
        outcome: Result<AnalysisResult, UploadFailure>,
    ) -> bool {
        if self.in_flight() != Some(submission_id) {
            return false;
        }
        self.phase = match outcome {
            Ok(analysis) => Phase::Succeeded(analysis),
            Err(failure) => Phase::Failed {
                message: failure.user_message(),
            },
        };
        self.mark_dirty();
        true
    }

    /// Abandons the current submission. Returns its id if one was in flight.
    pub(crate) fn cancel(&mut self) -> Option<SubmissionId> {
        let submission_id = self.in_flight()?;
        self.phase = Phase::Failed {
            message: UPLOAD_CANCELLED_MESSAGE.to_string(),
        };
        self.mark_dirty();
        Some(submission_id)
    }

    fn in_flight(&self) -> Option<SubmissionId> {
        match self.phase {
            Phase::Uploading { submission_id, .. } => Some(submission_id),
            _ => None,
        }
    }

    fn clear_error(&mut self) {
        if matches!(self.phase, Phase::Idle { .. } | Phase::Failed { .. }) {
            self.phase = Phase::Idle { notice: None };
        }
    }
}

/// `round(sent * 100 / total)`, clamped to 100.
fn percent_of(sent: u64, total: u64) -> u8 {
    let sent = u128::from(sent.min(total));
    let total = u128::from(total);
    let rounded = (sent * 100 + total / 2) / total;
    rounded.min(100) as u8
}
