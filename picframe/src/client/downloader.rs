//! Image download as a prefetch source.

use super::http::HttpClient;
use super::registration::ServerSession;
use crate::prefetch::{FetchError, FetchSource};
use tracing::trace;

/// Downloads images from a registered server session.
///
/// This is the production [`FetchSource`]: every call GETs the session's
/// image URL and hands the encoded bytes to the prefetcher. The prefetcher
/// calls it from its single worker thread, so the downloader owns its HTTP
/// client outright.
pub struct ImageDownloader<C: HttpClient> {
    http: C,
    image_url: String,
}

impl<C: HttpClient> ImageDownloader<C> {
    /// Create a downloader for the given session.
    pub fn new(http: C, session: &ServerSession) -> Self {
        Self {
            http,
            image_url: session.image_url().to_string(),
        }
    }
}

impl<C: HttpClient + 'static> FetchSource for ImageDownloader<C> {
    type Item = Vec<u8>;

    fn fetch(&mut self) -> Result<Vec<u8>, FetchError> {
        let bytes = self
            .http
            .get(&self.image_url)
            .map_err(|e| FetchError::Http(e.to_string()))?;
        trace!(bytes = bytes.len(), "downloaded image");
        Ok(bytes)
    }
}
