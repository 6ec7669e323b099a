mod builder;

use docchat_model::ModelRequest;

use crate::compose::compose;
use crate::conversation::{Conversation, Message};
use crate::extract::{
    ContentExtractor, DocumentInput, Error as ExtractError, ExtractedDocument,
};
use crate::model_client::{InferenceError, ModelClient};
pub use builder::ChatSessionBuilder;

/// One interactive chat session.
///
/// The session owns its transcript, so two sessions never see each other's
/// messages. Turns take `&mut self` and run one after another: extract the
/// attached document, compose the prompt, ask the model, record both sides.
/// Dropping the session ends it.
pub struct ChatSession {
    model_client: ModelClient,
    extractor: ContentExtractor,
    conversation: Conversation,
}

/// What happened during one turn.
#[derive(Debug)]
pub struct TurnReport {
    /// Why the document context was dropped, if it was.
    pub notice: Option<ExtractError>,
    /// The document context used for this turn.
    pub document: ExtractedDocument,
    /// The text that was sent to the model.
    pub prompt: String,
    /// The model's answer.
    pub response: Result<String, InferenceError>,
}

impl TurnReport {
    /// Returns the answer, if the model gave one.
    #[inline]
    pub fn answer(&self) -> Option<&str> {
        self.response.as_deref().ok()
    }
}

impl ChatSession {
    /// Returns the transcript so far.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the name of the model answering in this session.
    #[inline]
    pub fn model_name(&self) -> &str {
        self.model_client.model_name()
    }

    /// Runs a turn and waits for the complete answer.
    ///
    /// See [`submit_streaming`](Self::submit_streaming).
    #[inline]
    pub async fn submit(
        &mut self,
        question: &str,
        document: &DocumentInput,
    ) -> Option<TurnReport> {
        self.submit_streaming(question, document, |_| {}).await
    }

    /// Runs a turn, handing each piece of the answer to `on_delta` as it
    /// arrives.
    ///
    /// Returns `None` without doing anything when `question` is empty.
    ///
    /// A document that can't be extracted is reported in
    /// [`TurnReport::notice`] and the question is asked without it. The
    /// question is recorded before the model is asked, the answer only if
    /// the model delivered it completely.
    pub async fn submit_streaming(
        &mut self,
        question: &str,
        document: &DocumentInput,
        on_delta: impl Fn(&str) + Send + 'static,
    ) -> Option<TurnReport> {
        if question.is_empty() {
            debug!("empty question, no turn");
            return None;
        }

        let (document, notice) = match self.extractor.extract(document).await
        {
            Ok(extracted) => (extracted, None),
            Err(err) => {
                warn!("asking without document context: {err}");
                (ExtractedDocument::empty(document.source()), Some(err))
            }
        };
        debug!(
            "document context: {:?}, {} bytes",
            document.source(),
            document.context().map(str::len).unwrap_or(0)
        );

        let prompt = compose(question, document.context());
        self.conversation.append(Message::user(question));

        let request = ModelRequest::new(prompt.clone());
        let response =
            match self.model_client.send_request(request, on_delta).await {
                Ok(resp) => {
                    trace!("finish reason: {:?}", resp.finish_reason);
                    self.conversation
                        .append(Message::assistant(resp.text.clone()));
                    Ok(resp.text)
                }
                Err(err) => {
                    error!("no answer from {}: {err}", self.model_name());
                    Err(err)
                }
            };

        Some(TurnReport {
            notice,
            document,
            prompt,
            response,
        })
    }
}
