use crate::data_url::encode_data_url;

pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/bmp",
    "image/tiff",
    "image/webp",
];

const BYTES_PER_MB: u64 = 1024 * 1024;

pub const MAX_UPLOAD_BYTES: u64 = 16 * BYTES_PER_MB;

/// Input rejections surfaced to the user. `Display` is the alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid file type. Please select an image file (PNG, JPG, JPEG, BMP, TIFF, WebP)")]
    InvalidType,
    #[error("File is too large. Maximum size is {limit_mb}MB.")]
    TooLarge { limit_mb: u64 },
    #[error("Please select an image file")]
    NoFile,
}

/// What the browser tells us about a picked file before reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }
}

pub fn is_accepted_mime(mime: &str) -> bool {
    ACCEPTED_MIME_TYPES.contains(&mime)
}

pub fn validate(candidate: &FileCandidate, max_bytes: u64) -> Result<(), UploadError> {
    if !is_accepted_mime(&candidate.mime) {
        return Err(UploadError::InvalidType);
    }
    if candidate.size > max_bytes {
        return Err(UploadError::TooLarge {
            limit_mb: max_bytes / BYTES_PER_MB,
        });
    }
    Ok(())
}

pub fn check_submission(file_count: u32) -> Result<(), UploadError> {
    if file_count == 0 {
        return Err(UploadError::NoFile);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub bytes: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewTicket(u64);

impl PreviewTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// DOM-facing state of the upload widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadView {
    Empty,
    Preview { file_name: String, src: String },
}

impl UploadView {
    pub fn placeholder_display(&self) -> &'static str {
        match self {
            UploadView::Empty => "block",
            UploadView::Preview { .. } => "none",
        }
    }

    pub fn preview_display(&self) -> &'static str {
        match self {
            UploadView::Empty => "none",
            UploadView::Preview { .. } => "block",
        }
    }

    pub fn image_src(&self) -> &str {
        match self {
            UploadView::Empty => "",
            UploadView::Preview { src, .. } => src,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            UploadView::Empty => "",
            UploadView::Preview { file_name, .. } => file_name,
        }
    }
}

/// Tracks the single selected file and which asynchronous read may still
/// land. Every accepted selection and every clear bumps the sequence, so a
/// read that finishes late for a superseded selection is dropped.
#[derive(Debug)]
pub struct UploadSession {
    max_bytes: u64,
    selected: Option<SelectedFile>,
    current: Option<PreviewTicket>,
    next_seq: u64,
}

impl UploadSession {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            selected: None,
            current: None,
            next_seq: 1,
        }
    }

    pub fn select(&mut self, candidate: FileCandidate) -> Result<PreviewTicket, UploadError> {
        if let Err(err) = validate(&candidate, self.max_bytes) {
            self.clear();
            return Err(err);
        }
        let ticket = self.issue();
        self.selected = Some(SelectedFile {
            name: candidate.name,
            mime: candidate.mime,
            size: candidate.size,
            bytes: None,
        });
        self.current = Some(ticket);
        Ok(ticket)
    }

    /// Applies a finished read. Returns the view to render, or `None` when
    /// the ticket has been superseded.
    pub fn complete(&mut self, ticket: PreviewTicket, bytes: Vec<u8>) -> Option<UploadView> {
        if !self.is_current(ticket) {
            return None;
        }
        let selected = self.selected.as_mut()?;
        let src = encode_data_url(&selected.mime, &bytes);
        selected.bytes = Some(bytes);
        Some(UploadView::Preview {
            file_name: selected.name.clone(),
            src,
        })
    }

    pub fn clear(&mut self) -> UploadView {
        self.selected = None;
        self.current = None;
        // burn a sequence number so in-flight reads can never match again
        self.next_seq += 1;
        UploadView::Empty
    }

    pub fn is_current(&self, ticket: PreviewTicket) -> bool {
        self.current == Some(ticket)
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    fn issue(&mut self) -> PreviewTicket {
        let ticket = PreviewTicket(self.next_seq);
        self.next_seq += 1;
        ticket
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new(MAX_UPLOAD_BYTES)
    }
}
