#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file, or cancelled the picker (`None`).
    FileSelected(Option<crate::SelectedFile>),
    /// User asked for the selected file to be analysed.
    SubmitClicked,
    /// User abandoned the in-flight upload.
    CancelClicked,
    /// Transport progress for a submission. `total_bytes` is `None` when the
    /// transport cannot tell.
    UploadProgress {
        submission_id: crate::SubmissionId,
        bytes_sent: u64,
        total_bytes: Option<u64>,
    },
    /// Final outcome of a submission.
    UploadFinished {
        submission_id: crate::SubmissionId,
        outcome: Result<crate::AnalysisResult, crate::UploadFailure>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
