pub mod api;
pub mod connector_integration_v2;
pub mod events;
pub mod transport;
