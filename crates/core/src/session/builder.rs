use docchat_model::ModelProvider;

use super::ChatSession;
use crate::conversation::Conversation;
use crate::extract::{ContentExtractor, Fetcher};
use crate::model_client::ModelClient;

/// [`ChatSession`] builder.
pub struct ChatSessionBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) extractor: Option<ContentExtractor>,
}

impl ChatSessionBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            extractor: None,
        }
    }

    /// Fetches web pages with `fetcher` instead of the default HTTP client.
    #[inline]
    pub fn with_fetcher<F: Fetcher + 'static>(mut self, fetcher: F) -> Self {
        self.extractor = Some(ContentExtractor::with_fetcher(fetcher));
        self
    }

    /// Builds a session with an empty transcript.
    #[inline]
    pub fn build(self) -> ChatSession {
        ChatSession {
            model_client: self.model_client,
            extractor: self.extractor.unwrap_or_default(),
            conversation: Conversation::new(),
        }
    }
}
