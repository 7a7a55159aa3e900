use crate::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseLabel {
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFileView {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: PhaseLabel,
    pub selected_file: Option<SelectedFileView>,
    /// False while uploading, which keeps a second submission from being dispatched.
    pub submit_enabled: bool,
    /// Only present while uploading.
    pub progress: Option<u8>,
    pub error: Option<String>,
    pub analysis: Option<AnalysisResult>,
    pub dirty: bool,
}
