pub mod xml_utils;
pub use xml_utils::XmlElement;

#[macro_export]
macro_rules! with_response_body {
    ($connector:expr, $response:ident) => {
        tracing::debug!(connector = $connector, connector_response = ?$response);
    };
}
