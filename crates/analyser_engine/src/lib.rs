//! Analyser engine: upload transport, effect execution and report output.
mod engine;
mod filename;
mod persist;
mod report;
mod types;
mod upload;

pub use engine::EngineHandle;
pub use filename::report_filename;
pub use persist::{ensure_output_dir, save_report, AtomicFileWriter, PersistError};
pub use report::render_report;
pub use types::{EngineEvent, FailureKind, SubmissionId, UploadError, UploadProgress, UploadRequest};
pub use upload::{ChannelProgressSink, ProgressSink, ReqwestUploader, UploadSettings, Uploader};
