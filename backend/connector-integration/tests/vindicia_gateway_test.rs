#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::sync::{Arc, Mutex};

use common_enums::{AttemptStatus, Currency};
use common_utils::{errors::CustomResult, MinorUnit, Request};
use connector_integration::Gateway;
use domain_types::{
    connector_flow::FlowName,
    connector_types::{
        PaymentMethodRequestData, PaymentsAuthorizeData, PaymentsCaptureData,
        PaymentsResponseData, ResponseId, SubscriptionData,
    },
    errors::{ApiClientError, ConnectorError},
    payment_method_data::Card,
    router_response_types::Response,
    types::{ConnectorParams, Connectors, GatewaySettings},
};
use error_stack::report;
use hyperswitch_masking::{ExposeInterface, PeekInterface, Secret};
use interfaces::{
    events::{EventListener, GatewayEvent},
    transport::ConnectorTransport,
};

/// Records every request and answers with a canned response.
struct MockTransport {
    answer: Mutex<Option<CustomResult<Result<Response, Response>, ApiClientError>>>,
    sent: Mutex<Vec<Request>>,
}

impl MockTransport {
    fn answering(answer: CustomResult<Result<Response, Response>, ApiClientError>) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(Some(answer)),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<Request> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ConnectorTransport for MockTransport {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError> {
        self.sent.lock().unwrap().push(request);
        self.answer
            .lock()
            .unwrap()
            .take()
            .expect("a single request per test")
    }
}

#[derive(Default)]
struct RecordingListener {
    events: Mutex<Vec<GatewayEvent>>,
}

impl EventListener for RecordingListener {
    fn on_event(&self, event: &GatewayEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn gateway(test_mode: bool, transport: Arc<dyn ConnectorTransport>) -> Gateway {
    Gateway::new(
        GatewaySettings {
            username: Secret::new("soap-login".to_string()),
            password: Secret::new("soap-password".to_string()),
            test_mode,
        },
        Connectors {
            vindicia: ConnectorParams {
                base_url: "https://soap.vindicia.com/".to_string(),
                test_base_url: "https://soap.prodtest.sj.vindicia.com/".to_string(),
            },
        },
        transport,
    )
}

fn ok_response(body: &str) -> CustomResult<Result<Response, Response>, ApiClientError> {
    Ok(Ok(Response {
        headers: None,
        response: bytes::Bytes::from(body.to_string()),
        status_code: 200,
    }))
}

fn auth_response(return_code: &str, transaction: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <authResponse>
      <return>
        <returnCode>{return_code}</returnCode>
        <soapId>4f2c</soapId>
        <returnString>Card declined</returnString>
      </return>
      {transaction}
    </authResponse>
  </soap:Body>
</soap:Envelope>"#
    )
}

fn authorize_data() -> PaymentsAuthorizeData {
    PaymentsAuthorizeData {
        transaction_id: Some("order-42".to_string()),
        amount: Some(MinorUnit::new(1999)),
        currency: Currency::USD,
        customer_id: Some("customer-7".to_string()),
        card: Some(Card {
            number: Secret::new("4111111111111111".to_string()),
            expiry_month: Secret::new("1".to_string()),
            expiry_year: Secret::new("31".to_string()),
            cvv: Some(Secret::new("999".to_string())),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn gateway_is_named_after_the_vendor() {
    let transport = MockTransport::answering(ok_response(""));
    assert_eq!(gateway(false, transport).name(), "Vindicia");
}

#[test]
fn factories_only_wrap_their_input() {
    let transport = MockTransport::answering(ok_response(""));
    let gateway = gateway(true, transport.clone());

    let request = gateway.authorize(PaymentsAuthorizeData::default());
    assert_eq!(request.flow(), FlowName::Authorize);
    assert_eq!(request.request(), &PaymentsAuthorizeData::default());
    assert!(request.router_data().resource_common_data.test_mode);
    assert!(transport.sent().is_empty());
}

#[test]
fn update_and_create_differ_only_in_the_update_flag() {
    let transport = MockTransport::answering(ok_response(""));
    let gateway = gateway(false, transport);
    let data = SubscriptionData {
        subscription_id: Some("sub-9".to_string()),
        plan_id: Some("monthly".to_string()),
        ..Default::default()
    };

    let created = gateway.create_subscription(data.clone());
    let updated = gateway.update_subscription(data.clone());

    assert!(!created.request().is_update);
    assert!(updated.request().is_update);
    assert_eq!(
        &SubscriptionData {
            is_update: false,
            ..updated.request().clone()
        },
        created.request()
    );
    assert_eq!(created.flow(), updated.flow());

    let created = gateway.create_payment_method(PaymentMethodRequestData::default());
    let updated = gateway.update_payment_method(PaymentMethodRequestData::default());
    assert!(!created.request().is_update);
    assert!(updated.request().is_update);
}

#[test]
fn requests_can_be_adjusted_before_they_are_built() {
    let transport = MockTransport::answering(ok_response(""));
    let gateway = gateway(true, transport);

    let mut request = gateway.capture(PaymentsCaptureData::default());
    let error = request.build().unwrap_err();
    assert_eq!(
        *error.current_context(),
        ConnectorError::MissingRequiredField {
            field_name: "transaction_id"
        }
    );

    request.request_mut().transaction_id = Some("order-42".to_string());
    let built = request.build().unwrap().unwrap();
    assert_eq!(built.url, "https://soap.prodtest.sj.vindicia.com/soap.pl");
    assert_eq!(
        built.get_header("soapaction").unwrap().clone().into_inner(),
        "\"http://soap.vindicia.com/v18_0/Transaction#capture\""
    );
}

#[tokio::test]
async fn authorize_sends_to_the_production_endpoint_and_reads_the_vid() {
    let transport = MockTransport::answering(ok_response(&auth_response(
        "200",
        "<transaction><VID>9d2a</VID><merchantTransactionId>order-42</merchantTransactionId>\
         <statusLog><status>Authorized</status></statusLog></transaction>",
    )));
    let listener = Arc::new(RecordingListener::default());
    let gateway = gateway(false, transport.clone()).with_listener(listener.clone());

    let result = gateway.authorize(authorize_data()).send().await.unwrap();

    assert_eq!(result.resource_common_data.status, AttemptStatus::Authorized);
    assert_eq!(result.resource_common_data.soap_id.as_deref(), Some("4f2c"));
    match result.response.unwrap() {
        PaymentsResponseData::TransactionResponse { resource_id, .. } => assert_eq!(
            resource_id,
            ResponseId::ConnectorTransactionId("9d2a".to_string())
        ),
        other => panic!("unexpected response {other:?}"),
    }

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "https://soap.vindicia.com/soap.pl");
    let body = sent[0].body.as_ref().unwrap().get_inner_value().expose();
    assert!(body.contains("<tns:auth>"));
    assert!(body.contains("<amount>19.99</amount>"));
    assert!(body.contains("<expirationDate>203101</expirationDate>"));

    let events = listener.events.lock().unwrap().clone();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        GatewayEvent::RequestBeforeSend { flow: FlowName::Authorize, url, .. }
            if url == "https://soap.vindicia.com/soap.pl"
    ));
    assert!(matches!(
        events[1],
        GatewayEvent::ResponseReceived {
            flow: FlowName::Authorize,
            status_code: 200,
            successful: true,
            ..
        }
    ));
}

#[tokio::test]
async fn failing_return_code_is_stored_on_the_router_data() {
    let transport = MockTransport::answering(ok_response(&auth_response("402", "")));
    let gateway = gateway(true, transport);

    let result = gateway.authorize(authorize_data()).send().await.unwrap();

    let error = result.response.unwrap_err();
    assert_eq!(error.code, "402");
    assert_eq!(error.message, "Card declined");
    assert_eq!(result.resource_common_data.status, AttemptStatus::Failure);
}

#[tokio::test]
async fn invalid_requests_are_not_sent() {
    let transport = MockTransport::answering(ok_response(""));
    let listener = Arc::new(RecordingListener::default());
    let gateway = gateway(true, transport.clone()).with_listener(listener.clone());

    let error = gateway
        .purchase(PaymentsAuthorizeData {
            transaction_id: None,
            ..authorize_data()
        })
        .send()
        .await
        .unwrap_err();

    assert_eq!(
        *error.current_context(),
        ConnectorError::MissingRequiredField {
            field_name: "transaction_id"
        }
    );
    assert!(transport.sent().is_empty());
    assert!(listener.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn network_failures_emit_a_failure_event() {
    let transport = MockTransport::answering(Err(report!(ApiClientError::RequestNotSent(
        "connection reset".to_string()
    ))));
    let listener = Arc::new(RecordingListener::default());
    let gateway = gateway(true, transport).with_listener(listener.clone());

    let error = gateway
        .authorize(authorize_data())
        .send()
        .await
        .unwrap_err();

    assert!(matches!(
        error.current_context(),
        ConnectorError::ProcessingStepFailed(_)
    ));
    let events = listener.events.lock().unwrap().clone();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], GatewayEvent::RequestBeforeSend { .. }));
    assert!(matches!(
        &events[1],
        GatewayEvent::RequestFailed { flow: FlowName::Authorize, error, .. }
            if error.contains("connection reset")
    ));
}

#[tokio::test]
async fn server_errors_are_read_as_soap_faults() {
    let transport = MockTransport::answering(Ok(Err(Response {
        headers: None,
        response: bytes::Bytes::from_static(
            br#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Client</faultcode><faultstring>Bad login</faultstring></soap:Fault></soap:Body></soap:Envelope>"#,
        ),
        status_code: 500,
    })));
    let listener = Arc::new(RecordingListener::default());
    let gateway = gateway(true, transport).with_listener(listener.clone());

    let result = gateway.authorize(authorize_data()).send().await.unwrap();

    let error = result.response.unwrap_err();
    assert_eq!(error.code, "soap:Client");
    assert_eq!(error.message, "Bad login");
    assert_eq!(error.status_code, 500);
    assert!(matches!(
        listener.events.lock().unwrap()[1],
        GatewayEvent::ResponseReceived {
            status_code: 500,
            successful: false,
            ..
        }
    ));
}

#[test]
fn credentials_come_from_the_settings() {
    let transport = MockTransport::answering(ok_response(""));
    let gateway = gateway(true, transport);

    assert_eq!(gateway.settings().username.peek(), "soap-login");
    assert!(gateway.test_mode());
}
