pub mod config;
pub mod data_url;
pub mod konami;
pub mod page_style;
pub mod progress;
pub mod upload;
pub mod viewer;

pub use config::{ConfigError, PageConfig, RevealSettings, UploadElementIds, LAZYSIZES_SRC};
pub use data_url::encode_data_url;
pub use konami::{KeySequenceBuffer, KONAMI_SEQUENCE, RAINBOW_ANIMATION, RAINBOW_KEYFRAMES};
pub use progress::{FakeProgress, PROGRESS_CAP, PROGRESS_STEP_MAX};
pub use upload::{
    check_submission, is_accepted_mime, validate, FileCandidate, PreviewTicket, SelectedFile,
    UploadError, UploadSession, UploadView, ACCEPTED_MIME_TYPES, MAX_UPLOAD_BYTES,
};
pub use viewer::ViewerLatch;
