use crate::{AnalysisResult, SelectedFile, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the file to the analysis service.
    StartUpload {
        submission_id: SubmissionId,
        file: SelectedFile,
    },
    /// Abandon an in-flight upload; its late events are ignored either way.
    CancelUpload { submission_id: SubmissionId },
    /// A submission succeeded; the shell may persist a report.
    SaveAnalysis {
        file_name: String,
        analysis: AnalysisResult,
    },
}
