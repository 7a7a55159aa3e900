use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use analyser_core::{Effect, Msg};
use analyser_engine::{save_report, EngineEvent, EngineHandle, UploadRequest, UploadSettings};
use engine_logging::{engine_error, engine_info, engine_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
    save_dir: Option<PathBuf>,
}

impl EffectRunner {
    pub fn new(
        settings: UploadSettings,
        save_dir: Option<PathBuf>,
        app_tx: mpsc::Sender<AppEvent>,
    ) -> io::Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::new(settings, event_tx)?;
        spawn_event_loop(event_rx, app_tx)?;
        Ok(Self { engine, save_dir })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartUpload {
                    submission_id,
                    file,
                } => {
                    engine_info!(
                        "StartUpload submission={} file={} size={}",
                        submission_id,
                        file.name,
                        file.size
                    );
                    self.engine.upload(UploadRequest {
                        submission_id,
                        path: file.path,
                        file_name: file.name,
                    });
                }
                Effect::CancelUpload { submission_id } => {
                    engine_info!("CancelUpload submission={}", submission_id);
                    self.engine.cancel(submission_id);
                }
                Effect::SaveAnalysis {
                    file_name,
                    analysis,
                } => {
                    let Some(dir) = &self.save_dir else {
                        continue;
                    };
                    if let Err(err) = save_report(dir, &file_name, &analysis) {
                        engine_error!("Failed to save analysis for {}: {}", file_name, err);
                    }
                }
            }
        }
    }
}

fn spawn_event_loop(
    event_rx: mpsc::Receiver<EngineEvent>,
    app_tx: mpsc::Sender<AppEvent>,
) -> io::Result<()> {
    thread::Builder::new()
        .name("analyser-events".to_string())
        .spawn(move || {
            while let Ok(event) = event_rx.recv() {
                if app_tx.send(AppEvent::Core(map_event(event))).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::UploadProgress {
            submission_id: progress.submission_id,
            bytes_sent: progress.bytes_sent,
            total_bytes: progress.total_bytes,
        },
        EngineEvent::UploadCompleted {
            submission_id,
            result,
        } => Msg::UploadFinished {
            submission_id,
            outcome: result.map_err(|err| {
                engine_warn!("Submission {} failed: {}", submission_id, err);
                err.classify()
            }),
        },
    }
}
