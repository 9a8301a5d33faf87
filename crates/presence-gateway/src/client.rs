//! Gateway client run loop.
//!
//! One [`GatewayClient`] owns the socket for the life of the process. Each
//! iteration of [`GatewayClient::run`] is one session: connect, wait for
//! Hello, Identify or Resume, then pump heartbeats and events until the
//! gateway asks us to go away, the socket drops, or shutdown is signalled.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tracing::{debug, error, info, warn};

use presence_core::config::{DiscordConfig, GatewayCredentials, ProxySettings};
use presence_entity::User;

use crate::connection::transport::resume_url;
use crate::connection::{Backoff, Heartbeat, WsStream, connect};
use crate::error::GatewayError;
use crate::handler::HandlerRegistry;
use crate::message::close::{self, CloseAction};
use crate::message::payload::{self, GatewayPayload, HelloData};
use crate::message::OpCode;
use crate::state::{Dispatched, GatewayState, apply_dispatch};

/// Session identity kept across reconnects for resuming.
#[derive(Debug, Clone)]
struct Session {
    id: String,
    resume_url: Option<String>,
}

/// READY was applied and the session waits for READY_SUPPLEMENTAL.
#[derive(Debug, Clone)]
struct PendingReady {
    user: User,
    deadline: Instant,
}

/// Why a session loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Reconnect { resume: bool },
    Shutdown,
}

/// Long-running gateway connection feeding a [`GatewayState`].
#[derive(Debug)]
pub struct GatewayClient {
    credentials: GatewayCredentials,
    config: DiscordConfig,
    proxy: Option<ProxySettings>,
    state: Arc<GatewayState>,
    handlers: Arc<HandlerRegistry>,
    session: Option<Session>,
    sequence: Option<u64>,
    pending_ready: Option<PendingReady>,
}

impl GatewayClient {
    /// Create a client. Nothing is connected until [`run`](Self::run).
    pub fn new(
        credentials: GatewayCredentials,
        config: DiscordConfig,
        proxy: Option<ProxySettings>,
        state: Arc<GatewayState>,
        handlers: Arc<HandlerRegistry>,
    ) -> Self {
        Self {
            credentials,
            config,
            proxy,
            state,
            handlers,
            session: None,
            sequence: None,
            pending_ready: None,
        }
    }

    /// Keep a session alive until `shutdown` flips to `true`.
    ///
    /// Returns an error only for failures that reconnecting cannot fix,
    /// such as a rejected token.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), GatewayError> {
        let mut backoff = Backoff::new(
            Duration::from_millis(self.config.reconnect_initial_delay_ms),
            Duration::from_millis(self.config.reconnect_max_delay_ms),
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let outcome = self.run_session(&mut shutdown, &mut backoff).await;
            self.state.set_ready(false);

            match outcome {
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::Reconnect { resume }) => {
                    if !resume {
                        self.session = None;
                        self.sequence = None;
                    }
                }
                Err(err) if err.is_fatal() => {
                    error!(error = %err, "Gateway connection cannot recover");
                    self.handlers.dispatch_error("connect", &err).await;
                    return Err(err);
                }
                Err(err) => {
                    warn!(error = %err, "Gateway session ended with an error");
                }
            }

            let delay = backoff.next_delay();
            info!(
                delay_ms = delay.as_millis() as u64,
                resume = self.session.is_some(),
                "Reconnecting to gateway"
            );
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("Gateway client stopped");
        Ok(())
    }

    async fn run_session(
        &mut self,
        shutdown: &mut watch::Receiver<bool>,
        backoff: &mut Backoff,
    ) -> Result<SessionEnd, GatewayError> {
        let url = match self.session.as_ref().and_then(|s| s.resume_url.as_deref()) {
            Some(base) => resume_url(base, &self.config.gateway_url),
            None => self.config.gateway_url.clone(),
        };
        let timeout = Duration::from_secs(self.config.connect_timeout_seconds);
        self.pending_ready = None;

        info!(url = %url, proxy = self.proxy.is_some(), "Connecting to Discord gateway");
        let mut ws = connect(&url, self.proxy.as_ref(), timeout).await?;

        let hello = tokio::time::timeout(timeout, wait_for_hello(&mut ws))
            .await
            .map_err(|_| GatewayError::Timeout("hello"))??;
        debug!(heartbeat_interval = hello.heartbeat_interval, "Received Hello");
        let mut heartbeat = Heartbeat::new(Duration::from_millis(hello.heartbeat_interval));

        let greeting = match &self.session {
            Some(session) => {
                info!(session_id = %session.id, sequence = ?self.sequence, "Resuming session");
                payload::resume(&self.credentials.token, &session.id, self.sequence)?
            }
            None => {
                info!(token = %self.credentials.token_prefix(), "Identifying");
                payload::identify(&self.credentials.token, self.config.intents)?
            }
        };
        ws.send(WsMessage::Text(greeting.into())).await?;

        loop {
            let ready_deadline = self.pending_ready.as_ref().map(|p| p.deadline);

            tokio::select! {
                _ = sleep_until(ready_deadline), if ready_deadline.is_some() => {
                    warn!(
                        timeout_ms = self.config.ready_timeout_ms,
                        "READY_SUPPLEMENTAL not received, marking session ready"
                    );
                    self.state.set_ready(true);
                    self.finish_ready().await;
                }
                _ = heartbeat.tick() => {
                    if heartbeat.beat().is_err() {
                        warn!("Heartbeat not acknowledged, connection is a zombie");
                        return Ok(SessionEnd::Reconnect { resume: true });
                    }
                    ws.send(WsMessage::Text(payload::heartbeat(self.sequence)?.into())).await?;
                }
                frame = ws.next() => {
                    let Some(frame) = frame else {
                        warn!("Gateway stream ended");
                        return Ok(SessionEnd::Reconnect { resume: true });
                    };
                    match frame? {
                        WsMessage::Text(text) => {
                            if let Some(end) = self
                                .handle_payload(text.as_str(), &mut ws, &mut heartbeat, backoff)
                                .await?
                            {
                                return Ok(end);
                            }
                        }
                        WsMessage::Close(frame) => {
                            let (code, reason) = close_details(frame);
                            warn!(code, reason = %reason, "Gateway closed the connection");
                            return Ok(match close::classify(code, &reason)? {
                                CloseAction::Resume => SessionEnd::Reconnect { resume: true },
                                CloseAction::Reidentify => SessionEnd::Reconnect { resume: false },
                            });
                        }
                        WsMessage::Binary(_) => debug!("Ignoring binary frame"),
                        _ => {}
                    }
                }
                _ = shutdown.changed() => {
                    info!("Closing gateway connection");
                    let frame = CloseFrame {
                        code: CloseCode::Normal,
                        reason: "shutting down".into(),
                    };
                    if let Err(err) = ws.close(Some(frame)).await {
                        debug!(error = %err, "Close frame not delivered");
                    }
                    return Ok(SessionEnd::Shutdown);
                }
            }
        }
    }

    async fn handle_payload(
        &mut self,
        text: &str,
        ws: &mut WsStream,
        heartbeat: &mut Heartbeat,
        backoff: &mut Backoff,
    ) -> Result<Option<SessionEnd>, GatewayError> {
        let payload: GatewayPayload = match serde_json::from_str(text) {
            Ok(payload) => payload,
            Err(err) => {
                let err = GatewayError::from(err);
                warn!(error = %err, "Undecodable gateway payload");
                self.handlers.dispatch_error("payload", &err).await;
                return Ok(None);
            }
        };

        if payload.s.is_some() {
            self.sequence = payload.s;
        }

        match payload.op {
            OpCode::Dispatch => {
                let event = payload.t.unwrap_or_default();
                self.handle_dispatch(&event, payload.d, backoff).await;
            }
            OpCode::Heartbeat => {
                ws.send(WsMessage::Text(payload::heartbeat(self.sequence)?.into()))
                    .await?;
            }
            OpCode::HeartbeatAck => {
                heartbeat.acknowledge();
                debug!(latency = ?heartbeat.latency(), "Heartbeat acknowledged");
            }
            OpCode::Reconnect => {
                info!("Gateway requested a reconnect");
                return Ok(Some(SessionEnd::Reconnect { resume: true }));
            }
            OpCode::InvalidSession => {
                let resumable = payload.d.as_bool().unwrap_or(false);
                warn!(resumable, "Gateway invalidated the session");
                return Ok(Some(SessionEnd::Reconnect { resume: resumable }));
            }
            other => debug!(op = ?other, "Ignoring gateway payload"),
        }

        Ok(None)
    }

    async fn handle_dispatch(&mut self, event: &str, data: serde_json::Value, backoff: &mut Backoff) {
        match apply_dispatch(&self.state, event, data) {
            Ok(Dispatched::Ready {
                user,
                session_id,
                resume_gateway_url,
            }) => {
                self.session = Some(Session {
                    id: session_id,
                    resume_url: resume_gateway_url,
                });
                backoff.reset();
                debug!("Waiting for READY_SUPPLEMENTAL");
                self.pending_ready = Some(PendingReady {
                    user,
                    deadline: Instant::now() + Duration::from_millis(self.config.ready_timeout_ms),
                });
            }
            Ok(Dispatched::ReadySupplemental) => self.finish_ready().await,
            Ok(Dispatched::Resumed) => {
                backoff.reset();
                info!(sequence = ?self.sequence, "Gateway session resumed");
            }
            Ok(Dispatched::Message(message)) => self.handlers.dispatch_message(&message).await,
            Ok(Dispatched::Handled) => {}
            Err(err) => {
                let err = GatewayError::from(err);
                warn!(event = %event, error = %err, "Failed to apply dispatch");
                self.handlers.dispatch_error(event, &err).await;
            }
        }
    }

    async fn finish_ready(&mut self) {
        if let Some(pending) = self.pending_ready.take() {
            self.handlers.dispatch_ready(&pending.user).await;
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn wait_for_hello(ws: &mut WsStream) -> Result<HelloData, GatewayError> {
    while let Some(frame) = ws.next().await {
        match frame? {
            WsMessage::Text(text) => {
                let payload: GatewayPayload = serde_json::from_str(text.as_str())?;
                if payload.op != OpCode::Hello {
                    return Err(GatewayError::Protocol(format!(
                        "expected Hello, got {:?}",
                        payload.op
                    )));
                }
                return Ok(serde_json::from_value(payload.d)?);
            }
            WsMessage::Close(frame) => {
                let (code, reason) = close_details(frame);
                close::classify(code, &reason)?;
                return Err(GatewayError::Protocol(format!(
                    "closed before Hello with code {code}"
                )));
            }
            _ => continue,
        }
    }
    Err(GatewayError::Protocol("connection ended before Hello".to_string()))
}

fn close_details(frame: Option<CloseFrame>) -> (u16, String) {
    match frame {
        Some(frame) => (u16::from(frame.code), frame.reason.as_str().to_string()),
        None => (u16::from(CloseCode::Status), String::new()),
    }
}
