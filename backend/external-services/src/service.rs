use std::{str::FromStr, sync::Arc, time::Duration};

use common_utils::{
    request::{Headers, Method, Request, RequestContent},
    CustomResult,
};
use domain_types::{
    connector_flow::FlowName, errors::ApiClientError, errors::ConnectorError,
    router_data_v2::RouterDataV2, router_response_types::Response, types::Proxy,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{ExposeInterface, Maskable};
use interfaces::{
    connector_integration_v2::BoxedConnectorIntegrationV2,
    events::{EventListener, GatewayEvent},
    transport::ConnectorTransport,
};
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{field::Empty, Instrument};

use crate::shared_metrics;

/// Transport sending requests over HTTP with `reqwest`, through the configured proxy.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    proxy: Proxy,
}

impl HttpTransport {
    pub fn new(proxy: Proxy) -> Self {
        Self { proxy }
    }
}

#[async_trait::async_trait]
impl ConnectorTransport for HttpTransport {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        call_connector_api(&self.proxy, request).await
    }
}

fn emit(listeners: &[Arc<dyn EventListener>], event: &GatewayEvent) {
    listeners
        .iter()
        .for_each(|listener| listener.on_event(event));
}

fn mask_headers(headers: &Headers) -> Value {
    let masked_headers = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (k, v)| {
            let value = match v {
                Maskable::Masked(_) => {
                    Value::String(common_utils::consts::REDACTED.to_string())
                }
                Maskable::Normal(iv) => Value::String(iv.to_owned()),
            };
            acc.insert(k.clone(), value);
            acc
        });
    Value::Object(masked_headers)
}

/// Builds the request of one flow, sends it through `transport` and hands the answer back
/// to the connector.
///
/// Listeners see `RequestBeforeSend` first and then exactly one of `ResponseReceived` or
/// `RequestFailed`. A connector that builds no request leaves the router data untouched.
pub async fn execute_connector_processing_step<F, ResourceCommonData, Req, Resp>(
    transport: &dyn ConnectorTransport,
    listeners: &[Arc<dyn EventListener>],
    flow: FlowName,
    connector: BoxedConnectorIntegrationV2<'static, F, ResourceCommonData, Req, Resp>,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError>
where
    F: 'static,
    ResourceCommonData: 'static,
    Req: 'static,
    Resp: 'static,
{
    let span = tracing::info_span!(
        "outgoing_api",
        connector = connector.id(),
        flow = %flow,
        url = Empty,
        status_code = Empty,
        latency = Empty,
    );

    process_connector_request(transport, listeners, flow, connector, router_data)
        .instrument(span)
        .await
}

async fn process_connector_request<F, ResourceCommonData, Req, Resp>(
    transport: &dyn ConnectorTransport,
    listeners: &[Arc<dyn EventListener>],
    flow: FlowName,
    connector: BoxedConnectorIntegrationV2<'static, F, ResourceCommonData, Req, Resp>,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError>
where
    F: 'static,
    ResourceCommonData: 'static,
    Req: 'static,
    Resp: 'static,
{
    let connector_name = connector.id();
    let start = tokio::time::Instant::now();
    let Some(request) = connector.build_request_v2(&router_data)? else {
        return Ok(router_data);
    };

    let flow_label = flow.to_string();
    let url = request.url.clone();
    tracing::Span::current().record("url", tracing::field::display(&url));
    tracing::info!(
        request_headers = %mask_headers(&request.headers),
        request_body = request.body.as_ref().map(RequestContent::masked).unwrap_or_default(),
        "request of connector"
    );

    emit(
        listeners,
        &GatewayEvent::RequestBeforeSend {
            connector: connector_name,
            flow,
            url,
        },
    );
    shared_metrics::record_api_call(&flow_label, connector_name);

    let response = transport.send(request).await;
    let elapsed = start.elapsed();
    shared_metrics::record_api_latency(&flow_label, connector_name, elapsed);
    tracing::Span::current().record(
        "latency",
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    );

    let result = match response {
        Ok(Ok(body)) => {
            tracing::Span::current().record("status_code", body.status_code);
            emit(
                listeners,
                &GatewayEvent::ResponseReceived {
                    connector: connector_name,
                    flow,
                    status_code: body.status_code,
                    successful: true,
                },
            );
            tracing::debug!(
                response_body = %String::from_utf8_lossy(&body.response),
                "response from connector"
            );
            connector.handle_response_v2(&router_data, body)
        }
        Ok(Err(body)) => {
            tracing::Span::current().record("status_code", body.status_code);
            emit(
                listeners,
                &GatewayEvent::ResponseReceived {
                    connector: connector_name,
                    flow,
                    status_code: body.status_code,
                    successful: false,
                },
            );
            shared_metrics::record_api_error(
                &flow_label,
                connector_name,
                &body.status_code.to_string(),
            );
            let error = match body.status_code {
                500..=511 => connector.get_5xx_error_response(body)?,
                _ => connector.get_error_response_v2(body)?,
            };
            let mut router_data = router_data;
            router_data.response = Err(error);
            Ok(router_data)
        }
        Err(err) => {
            info_log(
                "NETWORK_ERROR",
                &json!(format!(
                    "Failed getting response from connector. Error: {:?}",
                    err
                )),
            );
            emit(
                listeners,
                &GatewayEvent::RequestFailed {
                    connector: connector_name,
                    flow,
                    error: err.current_context().to_string(),
                },
            );
            shared_metrics::record_api_error(
                &flow_label,
                connector_name,
                &err.current_context().to_string(),
            );
            Err(err.change_context(ConnectorError::ProcessingStepFailed(None)))
        }
    };

    tracing::info!(tag = ?Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
    result
}

pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());

    let client = create_client(proxy, should_bypass_proxy)?;

    let headers = request.headers.construct_header_map()?;

    let request = {
        match request.method {
            Method::Get => client.get(url),
            Method::Post => {
                let client = client.post(url);
                match request.body {
                    Some(RequestContent::Xml { raw, .. }) => client.body(raw.expose()),
                    None => client,
                }
            }
        }
        .add_headers(headers)
    };
    let send_request = async {
        request.send().await.map_err(|error| {
            let api_error = match error {
                error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
                _ => ApiClientError::RequestNotSent(error.to_string()),
            };
            info_log(
                "REQUEST_FAILURE",
                &json!(format!("Unable to send request to connector.",)),
            );
            report!(api_error)
        })
    };

    let response = send_request.await;

    handle_response(response).await
}

pub fn create_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    get_base_client(proxy_config, should_bypass_proxy)
}

static NON_PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

fn get_base_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    Ok(if should_bypass_proxy
        || (proxy_config.http_url.is_none() && proxy_config.https_url.is_none())
    {
        &NON_PROXIED_CLIENT
    } else {
        &PROXIED_CLIENT
    }
    .get_or_try_init(|| {
        get_client_builder(proxy_config, should_bypass_proxy)?
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)
            .inspect_err(|err| {
                info_log(
                    "ERROR",
                    &json!(format!("Failed to construct base client. Error: {:?}", err)),
                );
            })
    })?
    .clone())
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn handle_response(
    response: CustomResult<reqwest::Response, ApiClientError>,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let resp = response?;
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());
    match status_code {
        200..=202 | 302 | 204 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        // SOAP faults arrive as 500
        400..=599 => {
            let bytes = resp.bytes().await.map_err(|error| {
                report!(error).change_context(ApiClientError::ResponseDecodingFailed)
            })?;

            Ok(Err(Response {
                headers,
                response: bytes,
                status_code,
            }))
        }
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!("Unexpected response from server."),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let header_value = header_value.into_inner();
                let header_value = HeaderValue::from_str(&header_value)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

#[derive(Debug, Default, serde::Deserialize, Clone, strum::EnumString)]
pub enum Tag {
    /// General.
    #[default]
    General,
    /// Call initiated to connector.
    InitiatedToConnector,
    /// Api Outgoing Request
    OutgoingApi,
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}
