use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::Path;

use docchat_core::extract::{DocumentInput, Upload};
use mime::Mime;

/// Guesses the MIME type of an attachable file from its extension.
///
/// Only plain text and PDF files can be attached.
pub fn mime_for_path(path: &Path) -> Option<Mime> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "txt" => Some(mime::TEXT_PLAIN_UTF_8),
        "pdf" => Some(mime::APPLICATION_PDF),
        _ => None,
    }
}

/// The document the next questions are asked about.
///
/// Attachments persist across turns until replaced or detached.
#[derive(Clone, Debug, Default)]
pub struct Sidebar {
    input: DocumentInput,
}

impl Sidebar {
    /// Creates a sidebar with nothing attached.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current document input.
    #[inline]
    pub fn input(&self) -> &DocumentInput {
        &self.input
    }

    /// Reads the file at `path` and attaches it, replacing any previous
    /// file.
    pub async fn attach_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<(), AttachError> {
        let path = path.as_ref();
        let Some(mime) = mime_for_path(path) else {
            return Err(AttachError::UnsupportedType);
        };
        let bytes = tokio::fs::read(path).await.map_err(AttachError::Io)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!("attached {name} ({mime}, {} bytes)", bytes.len());

        self.input.set_upload(Some(Upload::new(name, mime, bytes)));
        Ok(())
    }

    /// Sets the URL to fetch context from.
    #[inline]
    pub fn set_url<S: Into<String>>(&mut self, url: S) {
        self.input.set_url(Some(url.into()));
    }

    /// Forgets the URL, so the attached file is used again.
    #[inline]
    pub fn clear_url(&mut self) {
        self.input.set_url(None);
    }

    /// Forgets both the file and the URL.
    #[inline]
    pub fn clear(&mut self) {
        self.input = DocumentInput::new();
    }

    /// Describes what is attached, for the status line.
    pub fn describe(&self) -> String {
        let file = self.input.upload().map(Upload::name);
        match (self.input.url(), file) {
            (Some(url), Some(file)) => format!("{url} (instead of {file})"),
            (Some(url), None) => url.to_owned(),
            (None, Some(file)) => file.to_owned(),
            (None, None) => "nothing".to_owned(),
        }
    }
}

/// The error returned when a file can't be attached.
#[derive(Debug)]
pub enum AttachError {
    /// The file is neither plain text nor PDF.
    UnsupportedType,
    /// The file couldn't be read.
    Io(io::Error),
}

impl Display for AttachError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::UnsupportedType => {
                f.write_str("only .txt and .pdf files can be attached")
            }
            AttachError::Io(err) => write!(f, "can't read the file: {err}"),
        }
    }
}

impl StdError for AttachError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AttachError::UnsupportedType => None,
            AttachError::Io(err) => Some(err),
        }
    }
}
