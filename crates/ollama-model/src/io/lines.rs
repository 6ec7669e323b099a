use super::{Chunks, ChunksError};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ChunksError(ChunksError),
    InvalidPayload,
}

/// A type for reading newline-delimited records from a chunk stream.
///
/// Bytes are buffered until a full line is available, so a record (or a
/// multi-byte character) split across chunks is reassembled before it is
/// decoded.
pub struct Lines {
    buf: Vec<u8>,
    chunks: Chunks,
    exhausted: bool,
}

impl Lines {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: Vec::new(),
            chunks,
            exhausted: false,
        }
    }

    /// Returns the next non-blank line, or `None` once the stream ends.
    pub async fn next_line(&mut self) -> Result<Option<String>, Error> {
        loop {
            if let Some(line) = self.try_take_line()? {
                if line.trim().is_empty() {
                    continue;
                }
                return Ok(Some(line));
            }

            if self.exhausted {
                // The last record may come without a trailing newline.
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let rest = std::mem::take(&mut self.buf);
                let line = decode(rest)?;
                if line.trim().is_empty() {
                    return Ok(None);
                }
                return Ok(Some(line));
            }

            match self.chunks.next_chunk().await.map_err(Error::ChunksError)? {
                Some(bytes) => self.buf.extend_from_slice(&bytes),
                None => self.exhausted = true,
            }
        }
    }

    fn try_take_line(&mut self) -> Result<Option<String>, Error> {
        let Some(eol_idx) = self.buf.iter().position(|b| *b == b'\n') else {
            return Ok(None);
        };
        let mut line: Vec<u8> = self.buf.drain(0..=eol_idx).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        decode(line).map(Some)
    }
}

#[inline]
fn decode(bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|_| Error::InvalidPayload)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[tokio::test]
    async fn test_normal_lines() {
        let chunks = Chunks::from_vec_deque(
            vec![
                Bytes::from_static(b"{\"a\":1}\n"),
                Bytes::from_static(b"{\"b\":2}\n"),
            ]
            .into(),
        );
        let mut lines = Lines::new(chunks);
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "{\"a\":1}");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "{\"b\":2}");
        assert_eq!(lines.next_line().await.unwrap(), None);
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_split_across_chunks() {
        // "é" is split between two chunks.
        let chunks = Chunks::from_vec_deque(
            vec![
                Bytes::from_static(b"caf\xc3"),
                Bytes::from_static(b"\xa9\r\n\n"),
                Bytes::from_static(b"tail"),
            ]
            .into(),
        );
        let mut lines = Lines::new(chunks);
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "café");
        assert_eq!(lines.next_line().await.unwrap().unwrap(), "tail");
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_data() {
        let chunks = Chunks::from_vec_deque(
            vec![Bytes::from_static(b"\xff\xfe\n")].into(),
        );
        let mut lines = Lines::new(chunks);
        assert_eq!(lines.next_line().await.unwrap_err(), Error::InvalidPayload);

        let chunks = Chunks::from_vec_deque(vec![].into());
        let mut lines = Lines::new(chunks);
        assert_eq!(lines.next_line().await.unwrap(), None);
    }
}
