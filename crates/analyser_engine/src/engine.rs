use std::collections::HashMap;
use std::io;
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_info, engine_warn};
use futures_util::FutureExt;
use tokio::task::JoinHandle;

use crate::upload::{ChannelProgressSink, ProgressSink, ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, FailureKind, SubmissionId, UploadError, UploadRequest};

enum EngineCommand {
    Upload(UploadRequest),
    Cancel { submission_id: SubmissionId },
}

/// Runs uploads on a background Tokio runtime and reports through `event_tx`.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: UploadSettings, event_tx: mpsc::Sender<EngineEvent>) -> io::Result<Self> {
        Self::with_uploader(Arc::new(ReqwestUploader::new(settings)), event_tx)
    }

    pub fn with_uploader(
        uploader: Arc<dyn Uploader>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("analyser-engine".to_string())
            .spawn(move || {
                let mut in_flight: HashMap<SubmissionId, JoinHandle<()>> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    in_flight.retain(|_, task| !task.is_finished());
                    match command {
                        EngineCommand::Upload(request) => {
                            let submission_id = request.submission_id;
                            let task = runtime.spawn(run_upload(
                                uploader.clone(),
                                request,
                                event_tx.clone(),
                            ));
                            in_flight.insert(submission_id, task);
                        }
                        EngineCommand::Cancel { submission_id } => {
                            if let Some(task) = in_flight.remove(&submission_id) {
                                engine_info!("Aborting submission {}", submission_id);
                                task.abort();
                            }
                        }
                    }
                }
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn upload(&self, request: UploadRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Upload(request));
    }

    /// Aborts an in-flight submission. An aborted submission reports no completion.
    pub fn cancel(&self, submission_id: SubmissionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { submission_id });
    }
}

async fn run_upload(
    uploader: Arc<dyn Uploader>,
    request: UploadRequest,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let submission_id = request.submission_id;
    let sink: Arc<dyn ProgressSink> = Arc::new(ChannelProgressSink::new(event_tx.clone()));
    // A panicking uploader still has to settle the submission.
    let result = AssertUnwindSafe(uploader.upload(&request, sink))
        .catch_unwind()
        .await
        .unwrap_or_else(|_| {
            engine_warn!("Upload task for submission {} panicked", submission_id);
            Err(UploadError::new(
                FailureKind::Unexpected,
                "upload task panicked",
            ))
        });
    let _ = event_tx.send(EngineEvent::UploadCompleted {
        submission_id,
        result,
    });
}
