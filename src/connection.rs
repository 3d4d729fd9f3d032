//! The connection multiplexer: owns a single duplex transport, serializes
//! writes, reassembles inbound frames, and pairs each reply with the
//! [`submit`](Multiplexer::submit) call that is waiting for it.
//!
//! A [`Multiplexer`] is cheap to clone — it is a handle around a shared,
//! `Arc`-backed state; the actual I/O happens on two background tasks
//! (`send_loop`, `receive_loop`) spawned by [`Multiplexer::connect`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::BytesMut;
use tokio::io::{split, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::{mpsc, oneshot, Notify};

use crate::document::{BsonCodec, DocumentCodec};
use crate::error::{Error, Result};
use crate::frame::{read_length_prefix, FramedMessage};

type Completion = Result<Option<FramedMessage>>;
type PendingMap = Arc<Mutex<HashMap<i32, oneshot::Sender<Completion>>>>;

/// Handle to a live connection. Clone freely; every clone shares the same
/// outbox, pending-reply table, and connected flag.
#[derive(Clone)]
pub struct Multiplexer {
    outbox: mpsc::UnboundedSender<(i32, Vec<u8>)>,
    pending: PendingMap,
    connected: Arc<AtomicBool>,
    disconnect: Arc<Notify>,
    codec: Arc<dyn DocumentCodec>,
}

/// The awaitable returned by [`Multiplexer::submit`].
///
/// By the time this value exists, every synchronous consequence of
/// `submit` — the connected check, the duplicate-id check, registering the
/// pending slot — has already happened. Awaiting it only waits for the
/// eventual reply (or an immediate result, for fire-and-forget payloads and
/// submit-time errors, which resolve on first poll).
pub struct PendingReply(oneshot::Receiver<Completion>);

impl Future for PendingReply {
    type Output = Completion;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().0).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // The sender was dropped without completing it — only happens if
            // a bug elsewhere removes a slot without resolving it.
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::Disconnected)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Multiplexer {
    /// Takes ownership of `stream` and spawns the send and receive tasks that
    /// drive it, using the default BSON-backed document codec.
    pub fn connect<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        Self::connect_with_codec(stream, Arc::new(BsonCodec))
    }

    /// As [`connect`](Self::connect), but with a caller-supplied document
    /// codec in place of [`BsonCodec`].
    pub fn connect_with_codec<S>(stream: S, codec: Arc<dyn DocumentCodec>) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (read_half, write_half) = split(stream);
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let connected = Arc::new(AtomicBool::new(true));
        let disconnect = Arc::new(Notify::new());

        tokio::spawn(send_loop(
            write_half,
            outbox_rx,
            pending.clone(),
            connected.clone(),
            disconnect.clone(),
        ));
        tokio::spawn(receive_loop(
            read_half,
            codec.clone(),
            pending.clone(),
            connected.clone(),
            disconnect.clone(),
        ));

        Multiplexer {
            outbox: outbox_tx,
            pending,
            connected,
            disconnect,
            codec,
        }
    }

    /// Whether the underlying transport is believed to still be open. Flips
    /// to `false` exactly once, on teardown, and never back.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Resolves once the connection has torn down. A no-op if it already has.
    pub async fn disconnected(&self) {
        loop {
            let notified = self.disconnect.notified();
            if !self.is_connected() {
                return;
            }
            notified.await;
        }
    }

    /// Submits a frame for sending and returns an awaitable for its reply.
    ///
    /// Everything this operation specifies synchronously already happens
    /// before this function returns: the not-connected check, the
    /// duplicate-request-id check, and — for a reply-bearing payload —
    /// inserting the pending slot into the correlation table. Only the
    /// actual wait for the reply (or the write to the transport, for a
    /// fire-and-forget payload) happens after the fact, on the two
    /// background tasks.
    ///
    /// A fire-and-forget payload (`OP_INSERT`/`OP_UPDATE`/`OP_DELETE`/
    /// `OP_KILL_CURSORS`) resolves the returned [`PendingReply`] to
    /// `Ok(None)` immediately; the frame is still hands off to the send task
    /// to be serialized and written exactly once.
    pub fn submit(&self, frame: FramedMessage) -> PendingReply {
        let (tx, rx) = oneshot::channel();

        if !self.is_connected() {
            let _ = tx.send(Err(Error::Disconnected));
            return PendingReply(rx);
        }

        let request_id = frame.request_id();
        let has_reply = frame.payload.has_reply();

        let bytes = match frame.encode(self.codec.as_ref()) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tx.send(Err(e));
                return PendingReply(rx);
            }
        };

        if has_reply {
            let mut pending = self.pending.lock().expect("pending table poisoned");
            if pending.contains_key(&request_id) {
                drop(pending);
                let _ = tx.send(Err(Error::DuplicateRequestId(request_id)));
                return PendingReply(rx);
            }
            pending.insert(request_id, tx);
        } else {
            let _ = tx.send(Ok(None));
        }

        if self.outbox.send((request_id, bytes)).is_err() {
            // The send task is gone, which only happens post-teardown. Fail
            // the slot we just registered rather than leaving it to dangle.
            if has_reply {
                if let Some(tx) = self
                    .pending
                    .lock()
                    .expect("pending table poisoned")
                    .remove(&request_id)
                {
                    let _ = tx.send(Err(Error::Disconnected));
                }
            }
        }

        PendingReply(rx)
    }
}

/// Drains the outbox, writing each frame's pre-encoded bytes to the
/// transport's write half. Exits cleanly when every [`Multiplexer`] handle
/// has been dropped (the channel closes) or the transport errors.
async fn send_loop<W>(
    mut write_half: WriteHalf<W>,
    mut outbox: mpsc::UnboundedReceiver<(i32, Vec<u8>)>,
    pending: PendingMap,
    connected: Arc<AtomicBool>,
    disconnect: Arc<Notify>,
) where
    W: AsyncWrite + Send,
{
    while let Some((request_id, bytes)) = outbox.recv().await {
        if let Err(e) = write_half.write_all(&bytes).await {
            tracing::error!(request_id, error = %e, "transport write failed");
            if let Some(tx) = pending.lock().expect("pending table poisoned").remove(&request_id) {
                let _ = tx.send(Err(Error::TransportError(e.to_string())));
            }
            teardown(&pending, &connected, &disconnect);
            return;
        }
    }
    tracing::debug!("send loop exiting: outbox closed");
}

/// Reads byte chunks from the transport's read half, reassembles whole
/// frames across chunk boundaries, and dispatches each to its waiting
/// [`submit`](Multiplexer::submit) call by `response_to`.
async fn receive_loop<R>(
    mut read_half: ReadHalf<R>,
    codec: Arc<dyn DocumentCodec>,
    pending: PendingMap,
    connected: Arc<AtomicBool>,
    disconnect: Arc<Notify>,
) where
    R: AsyncRead + Send,
{
    let mut buf = BytesMut::with_capacity(8 * 1024);
    loop {
        loop {
            if buf.len() < 4 {
                break;
            }
            let prefix: [u8; 4] = buf[0..4].try_into().unwrap();
            let declared_len = match read_length_prefix(&prefix) {
                Ok(len) => len as usize,
                Err(e) => {
                    tracing::error!(error = %e, "unrecoverable frame length prefix, tearing down");
                    teardown(&pending, &connected, &disconnect);
                    return;
                }
            };
            if buf.len() < declared_len {
                break;
            }

            let frame_bytes = buf.split_to(declared_len);
            match FramedMessage::decode(&frame_bytes, codec.as_ref()) {
                Ok(frame) => dispatch(&pending, frame),
                Err(e) => tracing::warn!(error = %e, "discarding malformed frame"),
            }
        }

        match read_half.read_buf(&mut buf).await {
            Ok(0) => {
                tracing::debug!("transport closed (eof)");
                teardown(&pending, &connected, &disconnect);
                return;
            }
            Ok(_) => continue,
            Err(e) => {
                tracing::error!(error = %e, "transport read failed");
                teardown(&pending, &connected, &disconnect);
                return;
            }
        }
    }
}

/// Pairs a decoded frame with its waiter by `response_to`. A reply with no
/// matching pending request is logged and discarded; the connection stays up.
fn dispatch(pending: &PendingMap, frame: FramedMessage) {
    let response_to = frame.response_to();
    let waiter = pending.lock().expect("pending table poisoned").remove(&response_to);
    match waiter {
        Some(tx) => {
            let _ = tx.send(Ok(Some(frame)));
        }
        None => {
            tracing::warn!(response_to, "unexpected response to unknown request id");
        }
    }
}

/// Marks the connection disconnected, fails every outstanding pending slot,
/// and wakes anyone blocked in [`Multiplexer::disconnected`]. Idempotent.
fn teardown(pending: &PendingMap, connected: &Arc<AtomicBool>, disconnect: &Arc<Notify>) {
    connected.store(false, Ordering::SeqCst);
    let mut pending = pending.lock().expect("pending table poisoned");
    for (_, tx) in pending.drain() {
        let _ = tx.send(Err(Error::Disconnected));
    }
    drop(pending);
    disconnect.notify_waiters();
}
