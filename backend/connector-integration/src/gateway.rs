//! Entry point of the connector.
//!
//! [`Gateway`] turns the flow inputs of a caller into [`GatewayRequest`]s. A request is not
//! validated and nothing is sent until [`GatewayRequest::build`] or [`GatewayRequest::send`]
//! is called, so callers can still adjust it through [`GatewayRequest::request_mut`].

use std::{marker::PhantomData, sync::Arc};

use common_enums::{AttemptStatus, RefundStatus};
use common_utils::{errors::CustomResult, request::Request};
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateCustomer, CreatePaymentMethod, CreateSubscription, FlowName,
        Purchase, Refund, Void,
    },
    connector_types::{
        CustomerData, PaymentFlowData, PaymentMethodRequestData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData, RefundFlowData,
        RefundsData, RefundsResponseData, SubscriptionData,
    },
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
    types::{Connectors, GatewaySettings},
};
use external_services::{
    configs::Config,
    service::{execute_connector_processing_step, HttpTransport},
};
use interfaces::{
    connector_integration_v2::{BoxedConnectorIntegrationV2, ConnectorIntegrationV2},
    events::EventListener,
    transport::ConnectorTransport,
};

use crate::connectors::Vindicia;

pub type AuthorizeRequest =
    GatewayRequest<Authorize, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>;
pub type PurchaseRequest =
    GatewayRequest<Purchase, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>;
pub type CaptureRequest =
    GatewayRequest<Capture, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>;
pub type VoidRequest =
    GatewayRequest<Void, PaymentFlowData, PaymentVoidData, PaymentsResponseData>;
pub type SubscriptionRequest =
    GatewayRequest<CreateSubscription, PaymentFlowData, SubscriptionData, PaymentsResponseData>;
pub type PaymentMethodRequest = GatewayRequest<
    CreatePaymentMethod,
    PaymentFlowData,
    PaymentMethodRequestData,
    PaymentsResponseData,
>;
pub type CustomerRequest =
    GatewayRequest<CreateCustomer, PaymentFlowData, CustomerData, PaymentsResponseData>;
pub type RefundRequest = GatewayRequest<Refund, RefundFlowData, RefundsData, RefundsResponseData>;

/// The Vindicia gateway, configured with credentials, endpoints and a transport.
pub struct Gateway {
    settings: GatewaySettings,
    connectors: Connectors,
    transport: Arc<dyn ConnectorTransport>,
    listeners: Vec<Arc<dyn EventListener>>,
}

impl Gateway {
    pub const NAME: &'static str = "Vindicia";

    pub fn new(
        settings: GatewaySettings,
        connectors: Connectors,
        transport: Arc<dyn ConnectorTransport>,
    ) -> Self {
        Self {
            settings,
            connectors,
            transport,
            listeners: Vec::new(),
        }
    }

    /// Builds a gateway that sends its requests over HTTP with the configured proxy.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gateway.clone(),
            config.connectors.clone(),
            Arc::new(HttpTransport::new(config.proxy.clone())),
        )
    }

    pub fn with_listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.add_listener(listener);
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn EventListener>) {
        self.listeners.push(listener);
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    pub fn test_mode(&self) -> bool {
        self.settings.test_mode
    }

    /// Reserves a transaction without capturing it.
    pub fn authorize(&self, request: PaymentsAuthorizeData) -> AuthorizeRequest {
        self.payment_request(FlowName::Authorize, request)
    }

    /// Authorizes and captures in a single call.
    pub fn purchase(&self, request: PaymentsAuthorizeData) -> PurchaseRequest {
        self.payment_request(FlowName::Purchase, request)
    }

    pub fn capture(&self, request: PaymentsCaptureData) -> CaptureRequest {
        self.payment_request(FlowName::Capture, request)
    }

    pub fn void(&self, request: PaymentVoidData) -> VoidRequest {
        self.payment_request(FlowName::Void, request)
    }

    pub fn create_subscription(&self, request: SubscriptionData) -> SubscriptionRequest {
        self.payment_request(
            FlowName::CreateSubscription,
            SubscriptionData {
                is_update: false,
                ..request
            },
        )
    }

    pub fn update_subscription(&self, request: SubscriptionData) -> SubscriptionRequest {
        self.payment_request(
            FlowName::CreateSubscription,
            SubscriptionData {
                is_update: true,
                ..request
            },
        )
    }

    pub fn create_payment_method(&self, request: PaymentMethodRequestData) -> PaymentMethodRequest {
        self.payment_request(
            FlowName::CreatePaymentMethod,
            PaymentMethodRequestData {
                is_update: false,
                ..request
            },
        )
    }

    pub fn update_payment_method(&self, request: PaymentMethodRequestData) -> PaymentMethodRequest {
        self.payment_request(
            FlowName::CreatePaymentMethod,
            PaymentMethodRequestData {
                is_update: true,
                ..request
            },
        )
    }

    /// Creates the customer, or updates it when the id is already known to Vindicia.
    pub fn create_customer(&self, request: CustomerData) -> CustomerRequest {
        self.payment_request(FlowName::CreateCustomer, request)
    }

    pub fn refund(&self, request: RefundsData) -> RefundRequest {
        let resource_common_data = RefundFlowData {
            status: RefundStatus::Pending,
            test_mode: self.test_mode(),
            connectors: self.connectors.clone(),
            soap_id: None,
        };
        self.gateway_request(FlowName::Refund, resource_common_data, request)
    }

    fn payment_request<F, Req>(
        &self,
        flow: FlowName,
        request: Req,
    ) -> GatewayRequest<F, PaymentFlowData, Req, PaymentsResponseData> {
        let resource_common_data = PaymentFlowData {
            status: AttemptStatus::Started,
            test_mode: self.test_mode(),
            connectors: self.connectors.clone(),
            soap_id: None,
        };
        self.gateway_request(flow, resource_common_data, request)
    }

    fn gateway_request<F, ResourceCommonData, Req, Resp>(
        &self,
        flow: FlowName,
        resource_common_data: ResourceCommonData,
        request: Req,
    ) -> GatewayRequest<F, ResourceCommonData, Req, Resp> {
        GatewayRequest {
            flow,
            router_data: RouterDataV2 {
                flow: PhantomData,
                resource_common_data,
                connector_auth_type: ConnectorAuthType::BodyKey {
                    api_key: self.settings.username.clone(),
                    key1: self.settings.password.clone(),
                },
                request,
                response: Err(ErrorResponse::default()),
            },
            transport: Arc::clone(&self.transport),
            listeners: self.listeners.clone(),
        }
    }
}

/// An unsent request bound to the transport of the gateway that created it.
pub struct GatewayRequest<F, ResourceCommonData, Req, Resp> {
    flow: FlowName,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
    transport: Arc<dyn ConnectorTransport>,
    listeners: Vec<Arc<dyn EventListener>>,
}

impl<F, ResourceCommonData, Req, Resp> GatewayRequest<F, ResourceCommonData, Req, Resp> {
    pub fn flow(&self) -> FlowName {
        self.flow
    }

    pub fn router_data(&self) -> &RouterDataV2<F, ResourceCommonData, Req, Resp> {
        &self.router_data
    }

    pub fn request(&self) -> &Req {
        &self.router_data.request
    }

    pub fn request_mut(&mut self) -> &mut Req {
        &mut self.router_data.request
    }

    pub fn into_router_data(self) -> RouterDataV2<F, ResourceCommonData, Req, Resp> {
        self.router_data
    }
}

impl<F, ResourceCommonData, Req, Resp> GatewayRequest<F, ResourceCommonData, Req, Resp>
where
    Vindicia: ConnectorIntegrationV2<F, ResourceCommonData, Req, Resp>,
    F: 'static,
    ResourceCommonData: 'static,
    Req: 'static,
    Resp: 'static,
{
    fn connector() -> BoxedConnectorIntegrationV2<'static, F, ResourceCommonData, Req, Resp> {
        let connector: &'static (dyn ConnectorIntegrationV2<F, ResourceCommonData, Req, Resp>
                      + Send
                      + Sync) = Vindicia::new();
        Box::new(connector)
    }

    /// Renders the outbound HTTP request without sending it.
    pub fn build(&self) -> CustomResult<Option<Request>, ConnectorError> {
        Self::connector().build_request_v2(&self.router_data)
    }

    /// Sends the request and returns the router data updated with the connector's answer.
    ///
    /// Declines and other connector side failures are returned in
    /// [`RouterDataV2::response`]; the error of this function means no answer could be
    /// obtained or understood.
    pub async fn send(
        self,
    ) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError> {
        let Self {
            flow,
            router_data,
            transport,
            listeners,
        } = self;

        execute_connector_processing_step(
            transport.as_ref(),
            &listeners,
            flow,
            Self::connector(),
            router_data,
        )
        .await
    }
}
