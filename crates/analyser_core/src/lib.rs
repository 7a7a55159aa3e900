//! Analyser core: pure upload state machine and view-model helpers.
mod effect;
mod failure;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use failure::UploadFailure;
pub use msg::Msg;
pub use state::{
    AnalysisResult, AppState, Phase, SelectedFile, SubmissionId, FILE_TOO_LARGE_MESSAGE,
    MAX_FILE_BYTES, UPLOAD_CANCELLED_MESSAGE,
};
pub use update::update;
pub use view_model::{AppViewModel, PhaseLabel, SelectedFileView};
