//! Events emitted around every call to the connector.

use domain_types::connector_flow::FlowName;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// The request is built and about to be handed to the transport.
    RequestBeforeSend {
        connector: &'static str,
        flow: FlowName,
        url: String,
    },
    /// The connector answered, successfully or not.
    ResponseReceived {
        connector: &'static str,
        flow: FlowName,
        status_code: u16,
        successful: bool,
    },
    /// No usable answer was obtained.
    RequestFailed {
        connector: &'static str,
        flow: FlowName,
        error: String,
    },
}

impl GatewayEvent {
    pub fn flow(&self) -> FlowName {
        match self {
            Self::RequestBeforeSend { flow, .. }
            | Self::ResponseReceived { flow, .. }
            | Self::RequestFailed { flow, .. } => *flow,
        }
    }
}

pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &GatewayEvent);
}

impl<F> EventListener for F
where
    F: Fn(&GatewayEvent) + Send + Sync,
{
    fn on_event(&self, event: &GatewayEvent) {
        self(event)
    }
}

/// Writes every event to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventListener;

impl EventListener for TracingEventListener {
    fn on_event(&self, event: &GatewayEvent) {
        match event {
            GatewayEvent::RequestFailed { .. } => {
                tracing::warn!(flow = %event.flow(), event = ?event, "gateway event")
            }
            _ => tracing::info!(flow = %event.flow(), event = ?event, "gateway event"),
        }
    }
}
