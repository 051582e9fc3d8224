use core::future::Future;

use photowall::Photo;
use tokio_util::sync::CancellationToken;

use crate::PageRequest;

/// Why a page fetch did not produce a page.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("malformed upstream response: {0}")]
    Malformed(String),
    #[error("fetch aborted")]
    Aborted,
}

impl FetchError {
    /// Aborts are expected control flow, not failures.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/// One page of upstream results.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhotoPage {
    pub photos: Vec<Photo>,
    pub page: u32,
    pub per_page: u32,
    /// Total number of matches, when the upstream reports it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_results: Option<u64>,
}

impl PhotoPage {
    pub fn new(photos: Vec<Photo>, page: u32, per_page: u32) -> Self {
        Self {
            photos,
            page,
            per_page,
            total_results: None,
        }
    }

    pub fn with_total_results(mut self, total_results: u64) -> Self {
        self.total_results = Some(total_results);
        self
    }

    /// Decodes an upstream `{photos, page, per_page, total_results}` body.
    #[cfg(feature = "json")]
    pub fn from_json(bytes: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(bytes).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

/// The upstream photo service (paged listing and free-text search).
///
/// Implementations should stop work once `cancel` is cancelled and return
/// [`FetchError::Aborted`]; [`crate::Feed`] also races the token itself, so a source that
/// ignores it still never delivers after an abort.
pub trait PhotoSource: Send + Sync + 'static {
    fn fetch(
        &self,
        request: PageRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<PhotoPage, FetchError>> + Send;
}
