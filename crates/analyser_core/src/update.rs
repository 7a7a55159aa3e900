use crate::{AppState, Effect, Msg, Phase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(candidate) => match state.select_file(candidate) {
            Some(submission_id) => vec![Effect::CancelUpload { submission_id }],
            None => Vec::new(),
        },
        Msg::SubmitClicked => match state.begin_submission() {
            Some((submission_id, file)) => vec![Effect::StartUpload {
                submission_id,
                file,
            }],
            None => Vec::new(),
        },
        Msg::CancelClicked => match state.cancel() {
            Some(submission_id) => vec![Effect::CancelUpload { submission_id }],
            None => Vec::new(),
        },
        Msg::UploadProgress {
            submission_id,
            bytes_sent,
            total_bytes,
        } => {
            state.apply_progress(submission_id, bytes_sent, total_bytes);
            Vec::new()
        }
        Msg::UploadFinished {
            submission_id,
            outcome,
        } => {
            if !state.apply_finished(submission_id, outcome) {
                return (state, Vec::new());
            }
            match (state.phase(), state.selected_file()) {
                (Phase::Succeeded(analysis), Some(file)) => vec![Effect::SaveAnalysis {
                    file_name: file.name.clone(),
                    analysis: analysis.clone(),
                }],
                _ => Vec::new(),
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
