use common_utils::{CustomResult, Request};
use domain_types::{errors::ApiClientError, router_response_types::Response};

/// Sends a built request to the connector.
///
/// The outer result reports requests that never got an answer; the inner one separates
/// success responses from error responses.
#[async_trait::async_trait]
pub trait ConnectorTransport: Send + Sync {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError>;
}
