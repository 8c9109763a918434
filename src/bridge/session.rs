//! # Bridge Sessions
//!
//! One [`Session`] per WebSocket connection. The read loop decodes client
//! frames and spawns one task per request, so requests on a session are
//! never serialized and replies may arrive in any order.
//!
//! Replies flow back through a bounded outbound queue. The session owns a
//! cancellation signal; when the connection ends the signal fires and every
//! in-flight request is dropped, aborting its pending upstream calls.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::observability::{Event, MetricsRegistry};

use super::aggregator::Aggregator;
use super::client::ResourceApi;
use super::config::BridgeConfig;
use super::errors::{BridgeError, BridgeResult};
use super::protocol::{ClientEvent, ServerEvent};

/// State shared by every session of one bridge
pub struct BridgeState {
    pub aggregator: Arc<Aggregator<dyn ResourceApi>>,
    pub metrics: Arc<MetricsRegistry>,
    pub outbound_buffer: usize,
}

impl BridgeState {
    pub fn new(
        config: &BridgeConfig,
        api: Arc<dyn ResourceApi>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            aggregator: Arc::new(Aggregator::new(
                api,
                config.max_in_flight_lookups,
                Arc::clone(&metrics),
            )),
            metrics,
            outbound_buffer: config.outbound_buffer.max(1),
        }
    }
}

/// One connected client
pub struct Session {
    id: Uuid,
    state: Arc<BridgeState>,
    outbound: mpsc::Sender<ServerEvent>,
    cancel: broadcast::Sender<()>,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Drive the connection until the client leaves
    pub async fn run(socket: WebSocket, state: Arc<BridgeState>) {
        let (outbound, mut replies) = mpsc::channel(state.outbound_buffer);
        let (cancel, _) = broadcast::channel(1);
        let session = Session {
            id: Uuid::new_v4(),
            state,
            outbound,
            cancel,
        };

        session.state.metrics.increment_sessions_opened();
        info!(event = %Event::SessionOpened, session = %session.id, "client connected");

        let (mut sink, mut stream) = socket.split();

        loop {
            tokio::select! {
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = session.handle_text(&text) {
                            session.state.metrics.increment_messages_rejected();
                            warn!(
                                event = %Event::MessageRejected,
                                session = %session.id,
                                error = %e,
                                "rejected client frame"
                            );
                            if !send_event(&mut sink, &ServerEvent::from(&e)).await {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        session.state.metrics.increment_messages_rejected();
                        let e = BridgeError::InvalidMessage("binary frames are not supported".to_string());
                        if !send_event(&mut sink, &ServerEvent::from(&e)).await {
                            break;
                        }
                    }
                    // Pings are answered by the websocket layer
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!(session = %session.id, error = %e, "websocket read failed");
                        break;
                    }
                },
                Some(reply) = replies.recv() => {
                    if !send_event(&mut sink, &reply).await {
                        break;
                    }
                }
            }
        }

        session.close();
    }

    /// Decode one client frame and spawn its request
    fn handle_text(&self, text: &str) -> Result<(), BridgeError> {
        let request = ClientEvent::decode(text)?;
        self.state.metrics.increment_requests();
        self.spawn_request(request);
        Ok(())
    }

    fn spawn_request(&self, request: ClientEvent) {
        let session_id = self.id;
        let aggregator = Arc::clone(&self.state.aggregator);
        let metrics = Arc::clone(&self.state.metrics);
        let outbound = self.outbound.clone();
        let mut cancelled = self.cancel.subscribe();

        tokio::spawn(async move {
            debug!(
                event = %Event::AggregationBegin,
                session = %session_id,
                request = request.name(),
                "request started"
            );

            tokio::select! {
                _ = cancelled.recv() => {
                    metrics.increment_aggregations_discarded();
                    debug!(
                        event = %Event::AggregationDiscarded,
                        session = %session_id,
                        request = request.name(),
                        "session closed, request dropped"
                    );
                }
                reply = execute(&aggregator, &metrics, session_id, request) => {
                    if outbound.send(reply).await.is_err() {
                        metrics.increment_replies_dropped();
                        debug!(
                            event = %Event::ReplyDropped,
                            session = %session_id,
                            request = request.name(),
                            "session gone before reply"
                        );
                    }
                }
            }
        });
    }

    fn close(self) {
        // Dropping the sender wakes every in-flight request
        drop(self.cancel);
        self.state.metrics.increment_sessions_closed();
        info!(event = %Event::SessionClosed, session = %self.id, "client disconnected");
    }
}

/// Run one request to its reply event
async fn execute(
    aggregator: &Aggregator<dyn ResourceApi>,
    metrics: &MetricsRegistry,
    session_id: Uuid,
    request: ClientEvent,
) -> ServerEvent {
    let result = match request {
        ClientEvent::GetBreweries => aggregator
            .list_with_images()
            .await
            .map(ServerEvent::Breweries),
        ClientEvent::GetBreweryById(id) => aggregator
            .get_one_with_images(id)
            .await
            .map(ServerEvent::BreweryDetails),
        ClientEvent::DeleteBrewery(id) => {
            aggregator.delete(id).await.map(ServerEvent::BreweryDeleted)
        }
    };

    match result {
        Ok(reply) => {
            metrics.increment_aggregations_completed();
            info!(
                event = %Event::AggregationComplete,
                session = %session_id,
                request = request.name(),
                reply = reply.name(),
                "request complete"
            );
            reply
        }
        Err(e) => {
            metrics.increment_aggregations_failed();
            warn!(
                event = %Event::AggregationFailed,
                session = %session_id,
                request = request.name(),
                code = e.code().as_str(),
                error = %e,
                "request failed"
            );
            ServerEvent::from(&e)
        }
    }
}

/// Write one event; `false` once the socket is unusable
async fn send_event(sink: &mut SplitSink<WebSocket, Message>, event: &ServerEvent) -> bool {
    match reply_text(event.name(), event.encode()) {
        Some(text) => sink.send(Message::Text(text)).await.is_ok(),
        None => false,
    }
}

/// Text to put on the wire for an encoded reply. A reply that cannot be
/// serialized is replaced by an `INTERNAL` error frame.
fn reply_text(name: &str, encoded: BridgeResult<String>) -> Option<String> {
    match encoded {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(
                event = %Event::ReplyEncodeFailed,
                reply = name,
                error = %e,
                "could not encode reply, sending internal error"
            );
            ServerEvent::from(&e).encode().ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_encoded_reply_passes_through() {
        let text = ServerEvent::BreweryDeleted(4).encode().unwrap();
        assert_eq!(reply_text("breweryDeleted", Ok(text.clone())), Some(text));
    }

    #[test]
    fn test_unencodable_reply_becomes_internal_error() {
        let failed = Err(BridgeError::Encode("key must be a string".to_string()));
        let text = reply_text("breweries", failed).unwrap();

        let frame: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(frame["event"], "error");
        assert_eq!(frame["code"], "INTERNAL");
        assert_eq!(frame["data"], "Could not encode reply: key must be a string");
    }
}
