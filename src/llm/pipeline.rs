//! Gateway pipeline: runs gateway calls on a worker thread
//!
//! The UI thread never awaits the network. It sends a `GatewayCommand` and
//! picks up the matching `GatewayEvent` on a later frame.

use crate::llm::gateway::{GatewayError, ResponseGateway};
use crate::{HabuError, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Commands that can be sent to the gateway pipeline
#[derive(Debug, Clone)]
pub enum GatewayCommand {
    /// Send a user turn and wait for the full reply
    Send {
        /// The trimmed user text
        text: String,
        /// Unique request ID for tracking
        request_id: Uuid,
    },

    /// Shutdown the pipeline
    Shutdown,
}

/// Events emitted by the gateway pipeline
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// The model answered
    Reply {
        /// Request ID this reply belongs to
        request_id: Uuid,
        /// Complete reply text
        text: String,
        /// Round-trip time in milliseconds
        elapsed_ms: u64,
    },

    /// The call failed
    Failed {
        /// Request ID this failure belongs to
        request_id: Uuid,
        /// Diagnostic error, not shown to the user
        error: GatewayError,
    },

    /// Pipeline has shut down
    Shutdown,
}

/// The Controller's end of the pipeline
#[derive(Clone, Debug)]
pub struct GatewayHandle {
    command_tx: Sender<GatewayCommand>,
    event_rx: Receiver<GatewayEvent>,
}

impl GatewayHandle {
    /// Build a handle from raw channel ends
    pub fn from_channels(command_tx: Sender<GatewayCommand>, event_rx: Receiver<GatewayEvent>) -> Self {
        Self {
            command_tx,
            event_rx,
        }
    }

    /// Queue a send request. Fails only when the worker is gone.
    pub fn dispatch(&self, text: String, request_id: Uuid) -> Result<()> {
        self.command_tx
            .send(GatewayCommand::Send { text, request_id })
            .map_err(|e| HabuError::ChannelError(format!("Gateway worker unavailable: {}", e)))
    }

    /// Next pending event, if any
    pub fn try_event(&self) -> Option<GatewayEvent> {
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Receiver for callers that want to block (tests, headless use)
    pub fn event_receiver(&self) -> &Receiver<GatewayEvent> {
        &self.event_rx
    }

    /// Ask the worker to exit
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(GatewayCommand::Shutdown);
    }
}

/// Gateway pipeline with channel-based communication
pub struct GatewayPipeline {
    /// The gateway, moved into the worker on start
    gateway: Box<dyn ResponseGateway>,

    /// Command sender
    command_tx: Sender<GatewayCommand>,

    /// Command receiver (for worker)
    command_rx: Receiver<GatewayCommand>,

    /// Event sender (for worker)
    event_tx: Sender<GatewayEvent>,

    /// Event receiver
    event_rx: Receiver<GatewayEvent>,
}

impl GatewayPipeline {
    /// Create a new pipeline around a gateway
    pub fn new(gateway: Box<dyn ResponseGateway>) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(16);

        Self {
            gateway,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Handle for the Controller
    pub fn handle(&self) -> GatewayHandle {
        GatewayHandle::from_channels(self.command_tx.clone(), self.event_rx.clone())
    }

    /// Start the pipeline worker thread
    ///
    /// The worker owns the gateway and a tokio runtime, and handles one
    /// command at a time.
    pub fn start_worker(self) -> Result<std::thread::JoinHandle<()>> {
        let Self {
            mut gateway,
            command_rx,
            event_tx,
            ..
        } = self;

        let runtime = Runtime::new()
            .map_err(|e| HabuError::ConfigError(format!("Failed to create tokio runtime: {}", e)))?;

        let handle = std::thread::Builder::new()
            .name("habu-gateway".to_string())
            .spawn(move || {
                info!("Gateway pipeline worker ready");

                loop {
                    match command_rx.recv() {
                        Ok(GatewayCommand::Send { text, request_id }) => {
                            debug!("Processing send request: {}", request_id);
                            let start_time = Instant::now();

                            let event = match runtime.block_on(gateway.send(&text)) {
                                Ok(reply) => GatewayEvent::Reply {
                                    request_id,
                                    text: reply,
                                    elapsed_ms: start_time.elapsed().as_millis() as u64,
                                },
                                Err(error) => {
                                    error!("Gateway request {} failed: {}", request_id, error);
                                    GatewayEvent::Failed { request_id, error }
                                }
                            };

                            if event_tx.send(event).is_err() {
                                info!("Gateway event receiver dropped, stopping worker");
                                break;
                            }
                        }
                        Ok(GatewayCommand::Shutdown) => {
                            info!("Gateway pipeline worker shutting down");
                            let _ = event_tx.send(GatewayEvent::Shutdown);
                            break;
                        }
                        Err(_) => {
                            debug!("Gateway command channel closed");
                            break;
                        }
                    }
                }

                info!("Gateway pipeline worker stopped");
            })
            .map_err(|e| HabuError::ChannelError(format!("Failed to spawn gateway worker: {}", e)))?;

        Ok(handle)
    }
}
