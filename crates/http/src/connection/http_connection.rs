use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use http::header::USER_AGENT;
use http::Response;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::select;
use tokio::time::error::Elapsed;
use tokio::time::timeout;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::message_writer::MessageWriter;
use crate::codec::RequestDecoder;
use crate::handler::{Handler, HandlerError};
use crate::protocol::{HttpError, Message, ParseError, PayloadItem, PayloadSize, Rejection, RequestHeader, SendError};

/// How long a connection may stay silent before it is dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

const READ_BUFFER_SIZE: usize = 8 * 1024;
const WRITE_BUFFER_SIZE: usize = 8 * 1024;

/// How one request/response cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleOutcome {
    /// response sent, wait for the next request
    KeepAlive,
    /// response sent, close the connection
    Close,
    /// close without sending anything
    Disconnect,
}

/// An HTTP connection that runs request/response cycles until it is closed
///
/// Each cycle reads one request head and its complete body, hands the request
/// to the handler and writes the response before the next request is decoded.
/// Malformed requests never reach the handler: they are answered with the
/// matching [`Rejection`] and, when fatal, the connection is closed afterwards.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    writer: MessageWriter<W>,
    idle_timeout: Duration,
    shutdown: CancellationToken,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), READ_BUFFER_SIZE),
            writer: MessageWriter::with_capacity(writer, WRITE_BUFFER_SIZE),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            shutdown: CancellationToken::new(),
        }
    }

    /// Sets how long any single read may wait for bytes.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Once `shutdown` is cancelled the connection closes instead of waiting for another request.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Serves requests until the connection is closed.
    ///
    /// Returns an error only for transport failures: the peer vanished mid-request,
    /// the idle timeout expired, or a response could not be written.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let result = loop {
            match self.serve_one(handler.as_ref()).await {
                Ok(CycleOutcome::KeepAlive) => continue,
                Ok(CycleOutcome::Close) | Ok(CycleOutcome::Disconnect) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        self.writer.shutdown().await;
        result
    }

    async fn serve_one<H>(&mut self, handler: &H) -> Result<CycleOutcome, HttpError>
    where
        H: Handler,
    {
        let (header, payload_size) = match self.read_message(true).await {
            Ok(Some(Message::Header(header))) => header,
            Ok(Some(Message::Payload(_))) => {
                error!("expect request header but receive body");
                return self.reject(ParseError::invalid_body("need header while receive body")).await;
            }
            Ok(None) => return Ok(CycleOutcome::Disconnect),
            Err(e) => return self.reject(e).await,
        };

        info!(
            request_line = header.request_line(),
            user_agent = header.headers().get(USER_AGENT).and_then(|v| v.to_str().ok()).unwrap_or("-"),
            "receive request"
        );

        let body = match self.read_body(payload_size).await {
            Ok(body) => body,
            Err(e) => return self.reject(e).await,
        };

        if header.expects_body() && !header.has_body_framing() {
            return self.respond_rejection(Rejection::LengthRequired, header.wants_close()).await;
        }

        self.dispatch(header, body, handler).await
    }

    async fn dispatch<H>(&mut self, header: RequestHeader, body: Bytes, handler: &H) -> Result<CycleOutcome, HttpError>
    where
        H: Handler,
    {
        let wants_close = header.wants_close();
        let request = header.body(body);

        match handler.call(request).await {
            Ok(response) => {
                self.send(response).await?;
                Ok(if wants_close { CycleOutcome::Close } else { CycleOutcome::KeepAlive })
            }
            Err(e) => {
                if let HandlerError::Internal { source } = &e {
                    error!(cause = %source, "handler failed");
                } else {
                    debug!(cause = %e, "handler refused request");
                }
                self.respond_rejection(Rejection::from(e), wants_close).await
            }
        }
    }

    /// Reads the next decoded item, bounded by the idle timeout.
    ///
    /// While awaiting a new request with nothing buffered, a shutdown signal ends the
    /// wait as if the peer had closed the connection. A request whose first bytes have
    /// already arrived is read to the end.
    async fn read_message(
        &mut self,
        awaiting_request: bool,
    ) -> Result<Option<Message<(RequestHeader, PayloadSize)>>, ParseError> {
        let Self { framed_read, idle_timeout, shutdown, .. } = self;
        let idle_timeout = *idle_timeout;

        if awaiting_request && framed_read.read_buffer().is_empty() {
            select! {
                biased;
                _ = shutdown.cancelled() => {}
                item = timeout(idle_timeout, framed_read.next()) => return Self::settle(item, idle_timeout),
            }

            if framed_read.read_buffer().is_empty() {
                debug!("shutdown signalled, stop awaiting requests");
                return Ok(None);
            }
            debug!(buffered = framed_read.read_buffer().len(), "shutdown signalled mid-request, finishing it");
        }

        Self::settle(timeout(idle_timeout, framed_read.next()).await, idle_timeout)
    }

    fn settle(
        item: Result<Option<Result<Message<(RequestHeader, PayloadSize)>, ParseError>>, Elapsed>,
        idle_timeout: Duration,
    ) -> Result<Option<Message<(RequestHeader, PayloadSize)>>, ParseError> {
        match item {
            Ok(Some(result)) => result.map(Some),
            Ok(None) => Ok(None),
            Err(_elapsed) => Err(ParseError::IdleTimeout(idle_timeout)),
        }
    }

    async fn read_body(&mut self, payload_size: PayloadSize) -> Result<Bytes, ParseError> {
        let mut body = match payload_size {
            PayloadSize::Length(length) => BytesMut::with_capacity(length.min(READ_BUFFER_SIZE as u64) as usize),
            PayloadSize::Chunked | PayloadSize::Empty => BytesMut::new(),
        };

        loop {
            match self.read_message(false).await? {
                Some(Message::Payload(PayloadItem::Chunk(bytes))) => body.extend_from_slice(&bytes),
                Some(Message::Payload(PayloadItem::Eof)) => return Ok(body.freeze()),
                Some(Message::Header(_)) => return Err(ParseError::invalid_body("expect body but receive header")),
                None => return Err(ParseError::ConnectionClosed),
            }
        }
    }

    /// Answers a request decoding failure, or gives up on the connection for transport failures.
    async fn reject(&mut self, error: ParseError) -> Result<CycleOutcome, HttpError> {
        match Rejection::from_parse_error(&error) {
            Some(rejection) => {
                warn!(cause = %error, status = rejection.status().as_u16(), "reject request");
                self.respond_rejection(rejection, false).await
            }
            None => {
                match &error {
                    ParseError::IdleTimeout(_) => warn!(cause = %error, "connection idle, closing"),
                    _ => info!(cause = %error, "can't read more request, break this connection down"),
                }
                Err(error.into())
            }
        }
    }

    async fn respond_rejection(&mut self, rejection: Rejection, wants_close: bool) -> Result<CycleOutcome, HttpError> {
        let close = wants_close || rejection.is_fatal();
        self.send(rejection.into_response()).await?;
        Ok(if close { CycleOutcome::Close } else { CycleOutcome::KeepAlive })
    }

    async fn send(&mut self, response: Response<Bytes>) -> Result<(), SendError> {
        let status = response.status();
        info!(status = status.as_u16(), reason = status.canonical_reason().unwrap_or("Unknown"), "send response");

        self.writer.write(response)?;
        self.writer.flush().await.inspect_err(|e| error!(cause = %e, "can't send response"))
    }
}
