use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::Error;

/// What came back from a GET request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedPage {
    /// The HTTP status code.
    pub status: u16,
    /// The decoded response body. Only filled in for `200` responses.
    pub body: String,
}

/// Something that can fetch a web page.
///
/// Any answer from the server, whatever its status, is a [`FetchedPage`].
/// Only failures to get an answer at all are errors, and those should use
/// the [`Transport`](super::ErrorKind::Transport) kind.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs a GET request to `url`.
    async fn get(&self, url: &str) -> Result<FetchedPage, Error>;
}

/// A [`Fetcher`] backed by a `reqwest` client with default settings.
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a fresh client.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher that shares an existing client.
    #[inline]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, Error> {
        let resp = self.client.get(url).send().await.map_err(transport)?;
        let status = resp.status();
        trace!("GET {url} -> {status}");
        if status != StatusCode::OK {
            return Ok(FetchedPage {
                status: status.as_u16(),
                body: String::new(),
            });
        }
        let body = resp.text().await.map_err(transport)?;
        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport(err: reqwest::Error) -> Error {
    // `reqwest` keeps the interesting part (refused, DNS, ...) in the source
    // chain.
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(err) = source {
        reason.push_str(": ");
        reason.push_str(&err.to_string());
        source = err.source();
    }
    Error::transport().with_reason(reason)
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::extract::ErrorKind;

    /// Answers the first connection with `status` and `body`.
    async fn serve_once(status: &str, body: &str) -> String {
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/page")
    }

    #[tokio::test]
    async fn test_ok_page() {
        let url = serve_once("200 OK", "<p>Hello</p>").await;
        let page = HttpFetcher::new().get(&url).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<p>Hello</p>");
    }

    #[tokio::test]
    async fn test_error_status_is_a_page() {
        let url = serve_once("404 Not Found", "<p>Gone</p>").await;
        let page = HttpFetcher::new().get(&url).await.unwrap();
        assert_eq!(page.status, 404);
        assert!(page.body.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpFetcher::new()
            .get(&format!("http://{addr}/"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().starts_with("An error occurred: "));
    }

    #[tokio::test]
    async fn test_malformed_url() {
        let err = HttpFetcher::new().get("not a url").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
