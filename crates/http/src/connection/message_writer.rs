use crate::codec::ResponseEncoder;
use crate::protocol::SendError;
use bytes::{Bytes, BytesMut};
use http::Response;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::debug;

/// Buffers encoded responses and writes them out on [`flush`](MessageWriter::flush).
#[derive(Debug)]
pub(crate) struct MessageWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
}

impl<W> MessageWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub(crate) fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder: ResponseEncoder::new() }
    }

    #[inline]
    pub(crate) fn write(&mut self, response: Response<Bytes>) -> Result<(), SendError> {
        self.encoder.encode(response, &mut self.buffer)
    }

    #[inline]
    pub(crate) async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.as_ref()).await?;
        self.buffer.clear();
        Ok(self.writer.flush().await?)
    }

    /// Closes the write half. Failures are ignored, the peer may already be gone.
    pub(crate) async fn shutdown(&mut self) {
        self.buffer.clear();
        if let Err(e) = self.writer.shutdown().await {
            debug!(cause = %e, "shutdown write half failed");
        }
    }
}
