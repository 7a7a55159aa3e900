use std::path::PathBuf;

use analyser_core::{update, AppState, Msg, SelectedFile, MAX_FILE_BYTES};

fn uploading(size: u64) -> AppState {
    let file = SelectedFile {
        name: "bill.pdf".to_string(),
        path: PathBuf::from("bill.pdf"),
        size,
    };
    let (state, _) = update(AppState::new(), Msg::FileSelected(Some(file)));
    let (state, _) = update(state, Msg::SubmitClicked);
    state
}

fn progress(state: AppState, submission_id: u64, sent: u64, total: Option<u64>) -> AppState {
    let (state, effects) = update(
        state,
        Msg::UploadProgress {
            submission_id,
            bytes_sent: sent,
            total_bytes: total,
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn ten_equal_chunks_progress_monotonically() {
    let total = MAX_FILE_BYTES;
    let chunk = total / 10;
    let mut state = uploading(total);
    let mut seen = Vec::new();

    for i in 1..=10 {
        state = progress(state, 1, chunk * i, Some(total));
        seen.push(state.view().progress.unwrap());
    }

    assert_eq!(seen, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(seen.iter().all(|p| *p <= 100));
}

#[test]
fn progress_rounds_to_nearest_percent() {
    let state = uploading(3);
    let state = progress(state, 1, 2, Some(3));
    assert_eq!(state.view().progress, Some(67));
}

#[test]
fn unknown_total_leaves_progress_unchanged() {
    let state = uploading(100);
    let state = progress(state, 1, 40, Some(100));
    let mut state = progress(state, 1, 80, None);
    assert_eq!(state.view().progress, Some(40));

    state.consume_dirty();
    let mut state = progress(state, 1, 90, Some(0));
    assert_eq!(state.view().progress, Some(40));
    assert!(!state.consume_dirty());
}

#[test]
fn progress_never_goes_backwards() {
    let state = uploading(100);
    let state = progress(state, 1, 60, Some(100));
    let state = progress(state, 1, 30, Some(100));
    assert_eq!(state.view().progress, Some(60));
}

#[test]
fn overshooting_transport_is_clamped() {
    let state = uploading(100);
    let state = progress(state, 1, 250, Some(100));
    assert_eq!(state.view().progress, Some(100));
}

#[test]
fn progress_for_other_submission_is_ignored() {
    let state = uploading(100);
    let state = progress(state, 7, 50, Some(100));
    assert_eq!(state.view().progress, Some(0));
}

#[test]
fn progress_outside_upload_is_ignored() {
    let state = AppState::new();
    let next = progress(state.clone(), 1, 50, Some(100));
    assert_eq!(next, state);
}
