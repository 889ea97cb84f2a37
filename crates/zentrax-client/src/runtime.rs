//! tokio event loop and WebSocket plumbing.
//!
//! Every socket and timer reports back through one unbounded channel of
//! [`Event`]s, and [`Runtime::run`] handles them strictly one at a time.

use crate::controller::{Controller, Event};
use crate::error::TransportError;
use crate::policy::ReconnectPolicy;
use crate::store::Render;
use crate::transport::{
    ConnectionId, Connector, Scheduler, TimerHandle, Transport, TransportEvent, TransportEventKind,
};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;

/// Settings for one dashboard session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    pub reconnect: ReconnectPolicy,
    pub history_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: zentrax_core::DEFAULT_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
            history_capacity: crate::history::History::DEFAULT_CAPACITY,
        }
    }
}

/// Opens WebSocket connections, one task per connection.
pub struct WsConnector {
    events: mpsc::UnboundedSender<Event>,
    outbound: Option<mpsc::UnboundedSender<String>>,
}

impl WsConnector {
    pub fn new(events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            events,
            outbound: None,
        }
    }
}

impl Connector for WsConnector {
    fn open(&mut self, id: ConnectionId, url: &str) -> Result<(), TransportError> {
        let request = url
            .into_client_request()
            .map_err(|_| TransportError::InvalidUrl(url.to_string()))?;

        // Dropping the previous sender tells its task to close.
        let (tx, rx) = mpsc::unbounded_channel();
        self.outbound = Some(tx);
        tokio::spawn(run_connection(id, request, self.events.clone(), rx));
        Ok(())
    }

    fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.outbound
            .as_ref()
            .ok_or(TransportError::NotConnected)?
            .send(text)
            .map_err(|_| TransportError::Closed)
    }
}

async fn run_connection(
    id: ConnectionId,
    request: tokio_tungstenite::tungstenite::handshake::client::Request,
    events: mpsc::UnboundedSender<Event>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let report = |kind| {
        let _ = events.send(Event::Transport(TransportEvent::new(id, kind)));
    };

    let ws = match tokio_tungstenite::connect_async(request).await {
        Ok((ws, _)) => ws,
        Err(e) => {
            report(TransportEventKind::Error(e.to_string()));
            report(TransportEventKind::Closed);
            return;
        }
    };
    report(TransportEventKind::Opened);

    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            frame = stream.next() => {
                let frame = match frame {
                    Some(Ok(frame)) => frame,
                    Some(Err(e)) => {
                        report(TransportEventKind::Error(e.to_string()));
                        break;
                    }
                    None => break,
                };

                match frame {
                    Message::Text(text) => {
                        report(TransportEventKind::Message(text.as_str().to_owned()))
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }

            text = outbound.recv() => {
                let Some(text) = text else {
                    tracing::debug!("Connection {} abandoned, closing", id);
                    let _ = sink.close().await;
                    break;
                };
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    report(TransportEventKind::Error(e.to_string()));
                    break;
                }
            }
        }
    }

    report(TransportEventKind::Closed);
}

/// Arms reconnect timers as tokio sleeps.
pub struct TokioScheduler {
    events: mpsc::UnboundedSender<Event>,
}

impl TokioScheduler {
    pub fn new(events: mpsc::UnboundedSender<Event>) -> Self {
        Self { events }
    }
}

impl TimerHandle for JoinHandle<()> {
    fn cancel(self) {
        self.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = JoinHandle<()>;

    fn schedule(&mut self, delay: Duration) -> JoinHandle<()> {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(Event::ReconnectDue);
        })
    }
}

/// The single event loop for one session.
pub struct Runtime {
    controller: Controller<WsConnector, TokioScheduler>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl Runtime {
    pub fn new(config: ClientConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let transport = Transport::new(
            config.url,
            WsConnector::new(events_tx.clone()),
            TokioScheduler::new(events_tx.clone()),
            config.reconnect,
        );
        Self {
            controller: Controller::new(transport, config.history_capacity),
            events_tx,
            events_rx,
        }
    }

    /// Handle for feeding user input into the loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.events_tx.clone()
    }

    /// Connect and process events until [`Event::Shutdown`].
    ///
    /// Every render update is forwarded to `renders`; a dropped receiver is not
    /// an error.
    pub async fn run(mut self, renders: mpsc::UnboundedSender<Render>) {
        self.controller.start();
        self.flush(&renders);

        while let Some(event) = self.events_rx.recv().await {
            let shutdown = event == Event::Shutdown;
            self.controller.handle(event);
            self.flush(&renders);
            if shutdown {
                tracing::info!("Session shut down");
                break;
            }
        }
    }

    fn flush(&mut self, renders: &mpsc::UnboundedSender<Render>) {
        for render in self.controller.take_renders() {
            let _ = renders.send(render);
        }
    }
}
