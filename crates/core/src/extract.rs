//! Turning an uploaded document or a web page into plain text.

mod error;
mod fetch;
mod html;

use std::fmt::{self, Debug};
use std::sync::Arc;

use mime::Mime;

pub use error::{Error, ErrorKind};
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use html::paragraph_text;

/// Where the document context of a turn came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// An uploaded file.
    File,
    /// A fetched web page.
    Url,
    /// Nothing was attached.
    None,
}

/// A file handed over by the user, with the MIME type the front-end
/// determined for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    name: String,
    mime: Mime,
    bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload.
    #[inline]
    pub fn new<S: Into<String>>(name: S, mime: Mime, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// Returns the file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the MIME type.
    #[inline]
    pub fn mime(&self) -> &Mime {
        &self.mime
    }

    /// Returns the raw content.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// The document inputs the user has set up for the next turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentInput {
    upload: Option<Upload>,
    url: Option<String>,
}

impl DocumentInput {
    /// Creates an input with nothing attached.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an uploaded file.
    #[inline]
    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Sets the URL to fetch.
    #[inline]
    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replaces the uploaded file.
    #[inline]
    pub fn set_upload(&mut self, upload: Option<Upload>) {
        self.upload = upload;
    }

    /// Replaces the URL.
    #[inline]
    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url;
    }

    /// Returns the uploaded file.
    #[inline]
    pub fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    /// Returns the URL, if a non-empty one is set.
    #[inline]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }

    /// Returns the source extraction will read from.
    #[inline]
    pub fn source(&self) -> SourceKind {
        if self.url().is_some() {
            SourceKind::Url
        } else if self.upload.is_some() {
            SourceKind::File
        } else {
            SourceKind::None
        }
    }

    /// Returns `true` if neither a file nor a URL is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.upload.is_none() && self.url().is_none()
    }
}

/// The outcome of extracting a turn's document input.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtractedDocument {
    source: SourceKind,
    text: Option<String>,
}

impl ExtractedDocument {
    /// A document for turns without any attachment.
    #[inline]
    pub fn none() -> Self {
        Self {
            source: SourceKind::None,
            text: None,
        }
    }

    /// A document from `source` that yielded no text, e.g. because
    /// reading it failed.
    #[inline]
    pub fn empty(source: SourceKind) -> Self {
        Self::new(source, None)
    }

    #[inline]
    fn new(source: SourceKind, text: Option<String>) -> Self {
        Self { source, text }
    }

    /// Returns where the document came from.
    #[inline]
    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Returns the extracted text, which may be empty.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the text to add to the prompt, `None` if there is nothing
    /// worth adding.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.text().filter(|text| !text.is_empty())
    }
}

/// Converts the document input of a turn into plain text.
///
/// A non-empty URL always takes precedence over an uploaded file, even if
/// fetching it fails. The file is not looked at in that case.
#[derive(Clone)]
pub struct ContentExtractor {
    fetcher: Arc<dyn Fetcher>,
}

impl ContentExtractor {
    /// Creates an extractor that fetches pages with [`HttpFetcher`].
    #[inline]
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::new())
    }

    /// Creates an extractor with a custom fetcher.
    #[inline]
    pub fn with_fetcher<F: Fetcher + 'static>(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }

    /// Extracts the text of the given input.
    ///
    /// The returned error is meant for the user. It only means the turn
    /// has no document context, the question can still be asked.
    pub async fn extract(
        &self,
        input: &DocumentInput,
    ) -> Result<ExtractedDocument, Error> {
        if let Some(url) = input.url() {
            return self.extract_url(url).await;
        }
        if let Some(upload) = input.upload() {
            return extract_upload(upload);
        }
        Ok(ExtractedDocument::none())
    }

    async fn extract_url(&self, url: &str) -> Result<ExtractedDocument, Error> {
        debug!("fetching document from {url}");
        let page = self.fetcher.get(url).await?;
        if page.status != 200 {
            return Err(Error::fetch_failure()
                .with_reason(format!("HTTP status {}", page.status)));
        }
        let text = paragraph_text(&page.body);
        Ok(ExtractedDocument::new(SourceKind::Url, Some(text)))
    }
}

impl Default for ContentExtractor {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ContentExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentExtractor").finish_non_exhaustive()
    }
}

fn extract_upload(upload: &Upload) -> Result<ExtractedDocument, Error> {
    let essence = upload.mime().essence_str();
    if essence == mime::TEXT_PLAIN.essence_str() {
        debug!("reading {} as plain text", upload.name());
        let text = std::str::from_utf8(upload.bytes()).map_err(|err| {
            Error::decode().with_reason(format!("{}: {err}", upload.name()))
        })?;
        return Ok(ExtractedDocument::new(
            SourceKind::File,
            Some(text.to_owned()),
        ));
    }
    if essence == mime::APPLICATION_PDF.essence_str() {
        return Err(Error::unsupported_format()
            .with_reason("PDF support is not implemented yet."));
    }
    debug!("ignoring {} of type {essence}", upload.name());
    Ok(ExtractedDocument::new(SourceKind::File, None))
}
