// src/connection/transport.rs

//! The byte-stream abstraction a `Session` is built on.

use crate::core::SpinelTuneError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Framed, LinesCodec};

/// Protocol-level limit on a single request line.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// A duplex, line-oriented connection to one client.
#[async_trait]
pub trait Connection: Send {
    /// A printable identifier of the peer, used in logs.
    fn peer(&self) -> &str;

    /// Reads the next newline-terminated line. `Ok(None)` means the peer closed the stream.
    async fn read_line(&mut self) -> Result<Option<String>, SpinelTuneError>;

    /// Writes every line followed by `\n`, then flushes.
    async fn write_lines(&mut self, lines: &[String]) -> Result<(), SpinelTuneError>;

    /// Shuts down the write half of the stream.
    async fn close(&mut self) -> Result<(), SpinelTuneError>;
}

/// A `Connection` over any async byte stream, framed with `LinesCodec`.
pub struct LineConnection<S> {
    framed: Framed<S, LinesCodec>,
    peer: String,
}

impl<S> LineConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            framed: Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
            peer: peer.into(),
        }
    }
}

#[async_trait]
impl<S> Connection for LineConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn peer(&self) -> &str {
        &self.peer
    }

    async fn read_line(&mut self) -> Result<Option<String>, SpinelTuneError> {
        Ok(self.framed.next().await.transpose()?)
    }

    async fn write_lines(&mut self, lines: &[String]) -> Result<(), SpinelTuneError> {
        for line in lines {
            self.framed.feed(line.as_str()).await?;
        }
        SinkExt::<&str>::flush(&mut self.framed).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SpinelTuneError> {
        self.framed.get_mut().shutdown().await?;
        Ok(())
    }
}
