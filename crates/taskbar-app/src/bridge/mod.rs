//! Line-delimited JSON bridge to the browser host.
//!
//! The read loop never waits on the engine: verdicts are computed
//! synchronously, and management requests run on their own tasks so that
//! the events and replies they depend on keep flowing.

mod host;
pub(crate) mod protocol;


pub use host::{BridgeHost, CALL_TIMEOUT};

use std::sync::Arc;

use taskbar_routing::Engine;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use protocol::{Inbound, Outbound};

pub struct Bridge {
    engine: Engine,
    host: Arc<BridgeHost>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl Bridge {
    pub fn new(engine: Engine, host: Arc<BridgeHost>, outbound: mpsc::UnboundedSender<Outbound>) -> Self {
        Self {
            engine,
            host,
            outbound,
        }
    }

    /// Start the engine and pump messages until `input` closes.
    pub async fn run<R, W>(
        self,
        input: R,
        output: W,
        outbound_rx: mpsc::UnboundedReceiver<Outbound>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let writer = tokio::spawn(write_loop(output, outbound_rx));

        // Startup talks to the host, so it runs beside the read loop.
        let engine = self.engine.clone();
        let startup = tokio::spawn(async move { engine.start().await });

        let mut lines = input.lines();
        let result = loop {
            match lines.next_line().await {
                Ok(Some(line)) => self.handle_line(&line),
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        info!("host closed the connection");
        self.host.disconnect();
        startup.abort();
        writer.abort();
        result
    }

    /// Dispatch one message from the host.
    pub fn handle_line(&self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let message: Inbound = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "ignoring malformed message from host");
                return;
            }
        };

        match message {
            Inbound::Event { event } => {
                // Background work finishes on its own.
                let _ = self.engine.on_event(event);
            }
            Inbound::Navigate { id, request } => {
                let decision = self.engine.on_navigation(&request);
                self.send(Outbound::Verdict {
                    id,
                    verdict: decision.verdict,
                });
            }
            Inbound::Manage { id, request } => {
                let engine = self.engine.clone();
                let outbound = self.outbound.clone();
                tokio::spawn(async move {
                    let response = engine.handle_management(request).await;
                    if outbound.send(Outbound::Managed { id, response }).is_err() {
                        debug!(id, "connection closed before management response");
                    }
                });
            }
            Inbound::Reply { id, result, error } => {
                let reply = match error {
                    Some(message) => Err(message),
                    None => Ok(result.unwrap_or(serde_json::Value::Null)),
                };
                if !self.host.resolve(id, reply) {
                    debug!(id, "reply for a call nobody is waiting on");
                }
            }
        }
    }

    fn send(&self, message: Outbound) {
        if self.outbound.send(message).is_err() {
            debug!("connection closed, dropping message");
        }
    }
}

async fn write_loop<W>(mut output: W, mut rx: mpsc::UnboundedReceiver<Outbound>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to serialize message for host");
                continue;
            }
        };
        line.push('\n');
        if let Err(e) = output.write_all(line.as_bytes()).await {
            warn!(error = %e, "failed to write to host");
            return;
        }
        if let Err(e) = output.flush().await {
            warn!(error = %e, "failed to flush output to host");
            return;
        }
    }
}
