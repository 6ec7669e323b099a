use std::pin::Pin;
use std::task::{Context, Poll, ready};

use docchat_model::{
    ErrorKind, ModelFinishReason, ModelResponse, ModelResponseEvent,
};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::Lines;
use crate::proto::GenerateChunk;

struct PartialState {
    lines: Lines,
    // Set when the final chunk also carried text. The delta is emitted first,
    // the completion event on the next poll.
    pending_finish_reason: Option<ModelFinishReason>,
    finished: bool,
}

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextEvent = Result<(Option<ModelResponseEvent>, PartialState), Error>;

pin_project! {
    pub struct OllamaResponse {
        next_event_fut: Option<PinnedFuture<NextEvent>>,
    }
}

impl OllamaResponse {
    #[inline]
    pub(crate) fn from_lines(lines: Lines) -> Self {
        let partial_state = PartialState {
            lines,
            pending_finish_reason: None,
            finished: false,
        };
        let next_event_fut = async move { next_event(partial_state).await };
        Self {
            next_event_fut: Some(Box::pin(next_event_fut)),
        }
    }
}

impl ModelResponse for OllamaResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.project();
        let Some(next_event_fut) = this.next_event_fut else {
            return Poll::Ready(Ok(None));
        };
        let (event, partial_state) =
            match ready!(next_event_fut.as_mut().poll(cx)) {
                Ok((Some(event), partial_state)) => (event, partial_state),
                Ok((None, _)) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Err(err));
                }
            };

        let next_event_fut = async move { next_event(partial_state).await };
        *this.next_event_fut = Some(Box::pin(next_event_fut));

        Poll::Ready(Ok(Some(event)))
    }
}

async fn next_event(mut partial_state: PartialState) -> NextEvent {
    if let Some(reason) = partial_state.pending_finish_reason.take() {
        return Ok((Some(ModelResponseEvent::Completed(reason)), partial_state));
    }
    if partial_state.finished {
        return Ok((None, partial_state));
    }

    loop {
        let line = match partial_state.lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                return Err(Error::new(
                    "stream ended before the model finished",
                    ErrorKind::Other,
                ));
            }
            Err(err) => {
                return Err(Error::new(format!("{err:?}"), ErrorKind::Other));
            }
        };
        trace!("got stream line: {line}");

        let chunk = serde_json::from_str::<GenerateChunk>(&line)
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
        if let Some(error) = chunk.error {
            return Err(Error::new(error, ErrorKind::Rejected));
        }

        if chunk.done {
            partial_state.finished = true;
            let reason = chunk.finish_reason();
            if chunk.response.is_empty() {
                return Ok((
                    Some(ModelResponseEvent::Completed(reason)),
                    partial_state,
                ));
            }
            partial_state.pending_finish_reason = Some(reason);
            return Ok((
                Some(ModelResponseEvent::MessageDelta(chunk.response)),
                partial_state,
            ));
        }

        if !chunk.response.is_empty() {
            return Ok((
                Some(ModelResponseEvent::MessageDelta(chunk.response)),
                partial_state,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use bytes::Bytes;
    use docchat_model::ModelProviderError;

    use super::*;
    use crate::io::Chunks;

    fn response_of(chunks: Vec<&'static [u8]>) -> OllamaResponse {
        let chunks = Chunks::from_vec_deque(
            chunks.into_iter().map(Bytes::from_static).collect(),
        );
        OllamaResponse::from_lines(Lines::new(chunks))
    }

    async fn collect(
        resp: OllamaResponse,
    ) -> Result<(String, Option<ModelFinishReason>), Error> {
        let mut resp = pin!(resp);
        let mut text = String::new();
        let mut reason = None;
        while let Some(event) =
            poll_fn(|cx| resp.as_mut().poll_next_event(cx)).await?
        {
            match event {
                ModelResponseEvent::MessageDelta(delta) => {
                    text.push_str(&delta)
                }
                ModelResponseEvent::Completed(r) => reason = Some(r),
            }
        }
        Ok((text, reason))
    }

    #[tokio::test]
    async fn test_simple_events() {
        let resp = response_of(vec![
            b"{\"response\":\"Project X \",\"done\":false}\n",
            b"{\"response\":\"is due\",\"done\":false}\n{\"resp",
            b"onse\":\" Friday.\",\"done\":true,\"done_reason\":\"stop\"}\n",
        ]);
        let (text, reason) = collect(resp).await.unwrap();
        assert_eq!(text, "Project X is due Friday.");
        assert_eq!(reason, Some(ModelFinishReason::Stop));
    }

    #[tokio::test]
    async fn test_length_limit() {
        let resp = response_of(vec![
            b"{\"response\":\"abc\",\"done\":false}\n",
            b"{\"response\":\"\",\"done\":true,\"done_reason\":\"length\"}",
        ]);
        let (text, reason) = collect(resp).await.unwrap();
        assert_eq!(text, "abc");
        assert_eq!(reason, Some(ModelFinishReason::Length));
    }

    #[tokio::test]
    async fn test_error_payload() {
        let resp = response_of(vec![
            b"{\"response\":\"partial\",\"done\":false}\n",
            b"{\"error\":\"out of memory\"}\n",
        ]);
        let err = collect(resp).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(err.message(), "out of memory");
    }

    #[tokio::test]
    async fn test_truncated_stream() {
        let resp =
            response_of(vec![b"{\"response\":\"partial\",\"done\":false}\n"]);
        let err = collect(resp).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);

        let resp = response_of(vec![b"not json\n"]);
        let err = collect(resp).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
