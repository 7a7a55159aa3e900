use std::path::PathBuf;
use std::sync::Once;

use analyser_core::{
    update, AnalysisResult, AppState, Effect, Msg, Phase, PhaseLabel, SelectedFile,
    UploadFailure, UPLOAD_CANCELLED_MESSAGE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn bill() -> SelectedFile {
    SelectedFile {
        name: "bill.pdf".to_string(),
        path: PathBuf::from("/tmp/bill.pdf"),
        size: 4096,
    }
}

fn sample_analysis() -> AnalysisResult {
    AnalysisResult {
        summary: "Changes how pensions are indexed.".to_string(),
        key_points: vec!["Indexation moves to wages".to_string()],
        arguments_for: vec!["Keeps pace with living costs".to_string()],
        arguments_against: vec!["Costs more".to_string(), "Complex".to_string()],
    }
}

fn submitted() -> (AppState, Vec<Effect>) {
    let (state, _) = update(AppState::new(), Msg::FileSelected(Some(bill())));
    update(state, Msg::SubmitClicked)
}

fn finish(state: AppState, outcome: Result<AnalysisResult, UploadFailure>) -> AppState {
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            submission_id: 1,
            outcome,
        },
    );
    state
}

#[test]
fn submit_without_file_is_noop() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::SubmitClicked);

    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn submit_starts_upload() {
    init_logging();
    let (mut state, effects) = submitted();

    assert_eq!(
        effects,
        vec![Effect::StartUpload {
            submission_id: 1,
            file: bill(),
        }]
    );
    assert_eq!(
        state.phase(),
        &Phase::Uploading {
            submission_id: 1,
            percent: 0
        }
    );
    let view = state.view();
    assert_eq!(view.phase, PhaseLabel::Uploading);
    assert_eq!(view.progress, Some(0));
    assert!(!view.submit_enabled);
    assert!(state.consume_dirty());
}

#[test]
fn second_submit_while_uploading_is_rejected() {
    init_logging();
    let (state, _) = submitted();
    let (next, effects) = update(state.clone(), Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn success_stores_analysis_exactly() {
    init_logging();
    let (state, _) = submitted();
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            submission_id: 1,
            outcome: Ok(sample_analysis()),
        },
    );

    assert_eq!(state.phase(), &Phase::Succeeded(sample_analysis()));
    let view = state.view();
    assert_eq!(view.analysis, Some(sample_analysis()));
    assert_eq!(view.error, None);
    assert_eq!(view.progress, None);
    assert!(view.submit_enabled);
    assert_eq!(
        effects,
        vec![Effect::SaveAnalysis {
            file_name: "bill.pdf".to_string(),
            analysis: sample_analysis(),
        }]
    );
}

#[test]
fn analysis_parses_from_service_json() {
    let body = r#"{
        "summary": "Changes how pensions are indexed.",
        "key_points": ["Indexation moves to wages"],
        "arguments_for": ["Keeps pace with living costs"],
        "arguments_against": ["Costs more", "Complex"]
    }"#;
    let parsed: AnalysisResult = serde_json::from_str(body).unwrap();
    assert_eq!(parsed, sample_analysis());
}

#[test]
fn timeout_suggests_retry_or_smaller_file() {
    init_logging();
    let (state, _) = submitted();
    let state = finish(state, Err(UploadFailure::Timeout));

    let view = state.view();
    assert_eq!(view.phase, PhaseLabel::Failed);
    let message = view.error.unwrap();
    assert!(message.contains("try again"));
    assert!(message.contains("smaller file"));
    assert_eq!(view.analysis, None);
    assert_eq!(view.progress, None);
}

#[test]
fn server_detail_is_reported() {
    init_logging();
    let (state, _) = submitted();
    let state = finish(
        state,
        Err(UploadFailure::Server {
            status: 422,
            detail: Some("corrupt PDF".to_string()),
        }),
    );

    assert_eq!(state.view().error.as_deref(), Some("Error: corrupt PDF"));
}

#[test]
fn server_without_detail_is_unknown_error() {
    init_logging();
    let (state, _) = submitted();
    let state = finish(
        state,
        Err(UploadFailure::Server {
            status: 500,
            detail: None,
        }),
    );

    assert_eq!(state.view().error.as_deref(), Some("Error: Unknown error"));
}

#[test]
fn no_response_asks_to_check_connection() {
    init_logging();
    let (state, _) = submitted();
    let state = finish(
        state,
        Err(UploadFailure::NoResponse {
            reason: "connection refused".to_string(),
        }),
    );

    let message = state.view().error.unwrap();
    assert!(message.contains("check your connection"));
    assert!(message.contains("try again"));
}

#[test]
fn local_failure_is_prefixed() {
    init_logging();
    let (state, _) = submitted();
    let state = finish(
        state,
        Err(UploadFailure::Local {
            description: "failed to read bill.pdf".to_string(),
        }),
    );

    assert_eq!(
        state.view().error.as_deref(),
        Some("Error: failed to read bill.pdf")
    );
}

#[test]
fn resubmit_after_failure_resets_progress_and_error() {
    init_logging();
    let (state, _) = submitted();
    let (state, _) = update(
        state,
        Msg::UploadProgress {
            submission_id: 1,
            bytes_sent: 2048,
            total_bytes: Some(4096),
        },
    );
    let state = finish(state, Err(UploadFailure::Timeout));

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(
        effects,
        vec![Effect::StartUpload {
            submission_id: 2,
            file: bill(),
        }]
    );
    let view = state.view();
    assert_eq!(view.phase, PhaseLabel::Uploading);
    assert_eq!(view.progress, Some(0));
    assert_eq!(view.error, None);
}

#[test]
fn resubmit_after_success_clears_analysis() {
    init_logging();
    let (state, _) = submitted();
    let state = finish(state, Ok(sample_analysis()));

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects.len(), 1);
    let view = state.view();
    assert_eq!(view.analysis, None);
    assert_eq!(view.progress, Some(0));
}

#[test]
fn stale_completion_is_ignored() {
    init_logging();
    let (state, _) = submitted();
    let state = finish(state, Err(UploadFailure::Timeout));
    let (state, _) = update(state, Msg::SubmitClicked);

    // Submission 1 already settled; a duplicate report for it must not win.
    let (next, effects) = update(
        state.clone(),
        Msg::UploadFinished {
            submission_id: 1,
            outcome: Ok(sample_analysis()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn cancel_fails_current_submission() {
    init_logging();
    let (state, _) = submitted();
    let (state, effects) = update(state, Msg::CancelClicked);

    assert_eq!(effects, vec![Effect::CancelUpload { submission_id: 1 }]);
    assert_eq!(
        state.phase(),
        &Phase::Failed {
            message: UPLOAD_CANCELLED_MESSAGE.to_string()
        }
    );
    assert!(state.view().submit_enabled);
}

#[test]
fn cancel_when_idle_is_noop() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSelected(Some(bill())));
    let (next, effects) = update(state.clone(), Msg::CancelClicked);

    assert!(effects.is_empty());
    assert_eq!(next, state);
}
