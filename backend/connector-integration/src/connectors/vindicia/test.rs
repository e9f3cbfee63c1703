#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::marker::PhantomData;

    use common_enums::{AttemptStatus, Currency, RefundStatus};
    use common_utils::{errors::CustomResult, MinorUnit};
    use domain_types::{
        connector_flow::{Authorize, Capture, CreatePaymentMethod, CreateSubscription, Refund, Void},
        connector_types::{
            PaymentFlowData, PaymentMethodRequestData, PaymentVoidData, PaymentsAuthorizeData,
            PaymentsCaptureData, PaymentsResponseData, RefundFlowData, RefundsData,
            RefundsResponseData, ResponseId, SubscriptionData, TransactionItem,
        },
        errors::ConnectorError,
        payment_method_data::Card,
        refund_items::{RefundItem, RefundItemBag},
        router_data::{ConnectorAuthType, ErrorResponse},
        router_data_v2::RouterDataV2,
        router_response_types::Response,
        types::{ConnectorParams, Connectors},
    };
    use hyperswitch_masking::{ExposeInterface, Secret};
    use interfaces::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};
    use serde_json::json;

    use crate::connectors::Vindicia;

    const PASSWORD: &str = "soap-password";
    const CARD_NUMBER: &str = "4111111111111111";

    fn connectors() -> Connectors {
        Connectors {
            vindicia: ConnectorParams {
                base_url: "https://soap.vindicia.com/".to_string(),
                test_base_url: "https://soap.prodtest.sj.vindicia.com/".to_string(),
            },
        }
    }

    fn payment_flow_data(test_mode: bool) -> PaymentFlowData {
        PaymentFlowData {
            status: AttemptStatus::Started,
            test_mode,
            connectors: connectors(),
            soap_id: None,
        }
    }

    fn router_data<F, Req, Resp>(
        test_mode: bool,
        request: Req,
    ) -> RouterDataV2<F, PaymentFlowData, Req, Resp> {
        RouterDataV2 {
            flow: PhantomData,
            resource_common_data: payment_flow_data(test_mode),
            connector_auth_type: ConnectorAuthType::BodyKey {
                api_key: Secret::new("soap-login".to_string()),
                key1: Secret::new(PASSWORD.to_string()),
            },
            request,
            response: Err(ErrorResponse::default()),
        }
    }

    fn card() -> Card {
        Card {
            number: Secret::new(CARD_NUMBER.to_string()),
            expiry_month: Secret::new("12".to_string()),
            expiry_year: Secret::new("2030".to_string()),
            cvv: Some(Secret::new("123".to_string())),
            holder_name: Some(Secret::new("Jane Doe".to_string())),
            postcode: Some(Secret::new("94105".to_string())),
            country: Some("US".to_string()),
        }
    }

    fn authorize_data() -> PaymentsAuthorizeData {
        PaymentsAuthorizeData {
            transaction_id: Some("tx-1".to_string()),
            amount: Some(MinorUnit::new(1000)),
            currency: Currency::USD,
            customer_id: Some("cust-1".to_string()),
            card: Some(card()),
            ..Default::default()
        }
    }

    fn request_body<F, RCD, Req, Resp>(
        data: &RouterDataV2<F, RCD, Req, Resp>,
    ) -> CustomResult<(String, String), ConnectorError>
    where
        Vindicia: ConnectorIntegrationV2<F, RCD, Req, Resp>,
    {
        let body = <Vindicia as ConnectorIntegrationV2<F, RCD, Req, Resp>>::get_request_body(
            Vindicia::new(),
            data,
        )?
        .expect("request body");
        Ok((body.get_inner_value().expose(), body.masked().to_string()))
    }

    fn soap_response(method: &str, return_code: &str, return_string: &str, rest: &str) -> Response {
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <{method}Response>
      <return>
        <returnCode>{return_code}</returnCode>
        <soapId>soap-123</soapId>
        <returnString>{return_string}</returnString>
      </return>
      {rest}
    </{method}Response>
  </soap:Body>
</soap:Envelope>"#
        );
        Response {
            headers: None,
            response: bytes::Bytes::from(body),
            status_code: 200,
        }
    }

    fn missing_field(error: &error_stack::Report<ConnectorError>) -> &'static str {
        match error.current_context() {
            ConnectorError::MissingRequiredField { field_name } => *field_name,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn authorize_wraps_the_transaction_in_a_soap_envelope() {
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, authorize_data());

        let (raw, masked) = request_body(&data).unwrap();

        assert!(raw.contains(r#"xmlns:tns="http://soap.vindicia.com/v18_0/Transaction""#));
        assert!(raw.contains(r#"xmlns:vin="http://soap.vindicia.com/v18_0/Vindicia""#));
        assert!(raw.contains("<soap:Body><tns:auth>"));
        assert!(raw.contains("<login>soap-login</login>"));
        assert!(raw.contains("<version>18.0</version>"));
        assert!(raw.contains("<merchantTransactionId>tx-1</merchantTransactionId>"));
        assert!(raw.contains("<amount>10.00</amount>"));
        assert!(raw.contains("<currency>USD</currency>"));
        assert!(raw.contains("<merchantAccountId>cust-1</merchantAccountId>"));
        assert!(raw.contains("<expirationDate>203012</expirationDate>"));
        assert!(raw.contains("<name>CVN</name>"));
        assert!(raw.contains("<minChargebackProbability>100</minChargebackProbability>"));

        assert!(!masked.contains(CARD_NUMBER));
        assert!(!masked.contains(PASSWORD));
        assert!(masked.contains("Transaction.auth"));
    }

    #[test]
    fn card_security_code_is_masked_in_the_logged_body() {
        let mut request = authorize_data();
        request.card = Some(Card {
            cvv: Some(Secret::new("987".to_string())),
            ..card()
        });
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);

        let (raw, masked) = request_body(&data).unwrap();

        assert!(raw.contains(r#"<name>CVN</name><value xsi:type="xsd:string">987</value>"#));
        assert!(masked.contains("CVN"));
        assert!(!masked.contains("987"));
    }

    #[test]
    fn attributes_become_name_value_pairs() {
        let mut request = authorize_data();
        request.attributes = json!({ "vin_PaymentMethod_active": true, "retries": 2 })
            .as_object()
            .cloned()
            .unwrap();
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);

        let (raw, _) = request_body(&data).unwrap();

        assert!(raw.contains(
            r#"<name>vin_PaymentMethod_active</name><value xsi:type="xsd:boolean">true</value>"#
        ));
        assert!(raw.contains(r#"<name>retries</name><value xsi:type="xsd:string">2</value>"#));
    }

    #[test]
    fn nested_attribute_values_are_rejected_when_the_body_is_built() {
        let mut request = authorize_data();
        request.attributes = json!({ "tags": ["a", "b"] }).as_object().cloned().unwrap();
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);

        let error = request_body(&data).unwrap_err();
        assert_eq!(
            *error.current_context(),
            ConnectorError::InvalidArgument {
                message: "Invalid type array for parameter value".to_string()
            }
        );
    }

    #[test]
    fn authorize_requires_its_fields() {
        let mut request = authorize_data();
        request.transaction_id = None;
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);
        assert_eq!(missing_field(&request_body(&data).unwrap_err()), "transaction_id");

        let mut request = authorize_data();
        request.customer_id = None;
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);
        assert_eq!(missing_field(&request_body(&data).unwrap_err()), "customer_id");

        let mut request = authorize_data();
        request.card = None;
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);
        assert_eq!(missing_field(&request_body(&data).unwrap_err()), "card");

        let mut request = authorize_data();
        request.amount = None;
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);
        assert_eq!(missing_field(&request_body(&data).unwrap_err()), "amount");
    }

    #[test]
    fn amount_defaults_to_the_item_total_and_must_match_it() {
        let items = vec![
            TransactionItem {
                name: "Widget".to_string(),
                sku: "w-1".to_string(),
                price: MinorUnit::new(500),
                quantity: 3,
            },
            TransactionItem {
                name: "Gadget".to_string(),
                sku: "g-1".to_string(),
                price: MinorUnit::new(1000),
                quantity: 1,
            },
        ];

        let mut request = authorize_data();
        request.amount = None;
        request.items = items.clone();
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);
        let (raw, _) = request_body(&data).unwrap();
        assert!(raw.contains("<amount>25.00</amount>"));
        assert!(raw.contains("<sku>w-1</sku>"));
        assert!(raw.contains("<price>5.00</price>"));

        let mut request = authorize_data();
        request.items = items;
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);
        assert!(matches!(
            request_body(&data).unwrap_err().current_context(),
            ConnectorError::InvalidRequestData { .. }
        ));
    }

    #[test]
    fn overflowing_item_totals_are_rejected() {
        let mut request = authorize_data();
        request.amount = None;
        request.items = vec![TransactionItem {
            name: "Bulk".to_string(),
            sku: "b-1".to_string(),
            price: MinorUnit::new(i64::MAX / 2),
            quantity: 3,
        }];
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, request);

        assert!(matches!(
            request_body(&data).unwrap_err().current_context(),
            ConnectorError::InvalidRequestData { .. }
        ));
    }

    #[test]
    fn headers_name_the_soap_action() {
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, authorize_data());
        let headers = Vindicia::new().get_headers(&data).unwrap();

        let soap_action = headers
            .iter()
            .find(|(name, _)| name == "SOAPAction")
            .map(|(_, value)| value.clone().into_inner())
            .unwrap();
        assert_eq!(
            soap_action,
            "\"http://soap.vindicia.com/v18_0/Transaction#auth\""
        );
        assert!(headers
            .iter()
            .any(|(name, value)| name == "Content-Type"
                && value.clone().into_inner() == "text/xml; charset=utf-8"));
    }

    #[test]
    fn test_mode_selects_the_prodtest_endpoint() {
        let data = router_data::<Authorize, _, PaymentsResponseData>(
            true,
            authorize_data(),
        );
        assert_eq!(
            Vindicia::new().get_url(&data).unwrap(),
            "https://soap.prodtest.sj.vindicia.com/soap.pl"
        );

        let data = router_data::<Authorize, _, PaymentsResponseData>(
            false,
            authorize_data(),
        );
        assert_eq!(
            Vindicia::new().get_url(&data).unwrap(),
            "https://soap.vindicia.com/soap.pl"
        );
    }

    #[test]
    fn authorized_transaction_maps_to_its_vid() {
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, authorize_data());
        let response = soap_response(
            "auth",
            "200",
            "OK",
            "<transaction><VID>vid-1</VID><merchantTransactionId>tx-1</merchantTransactionId>\
             <statusLog><status>Authorized</status></statusLog></transaction><score>12</score>",
        );

        let result = Vindicia::new().handle_response_v2(&data, response).unwrap();

        assert_eq!(result.resource_common_data.status, AttemptStatus::Authorized);
        assert_eq!(result.resource_common_data.soap_id.as_deref(), Some("soap-123"));
        assert_eq!(
            result.response.unwrap(),
            PaymentsResponseData::TransactionResponse {
                resource_id: ResponseId::ConnectorTransactionId("vid-1".to_string()),
                merchant_transaction_id: Some("tx-1".to_string()),
                risk_score: Some(12),
            }
        );
    }

    #[test]
    fn failing_return_code_becomes_an_error_response() {
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, authorize_data());
        let response = soap_response("auth", "402", "Card declined", "");

        let result = Vindicia::new().handle_response_v2(&data, response).unwrap();

        assert_eq!(result.resource_common_data.status, AttemptStatus::Failure);
        let error = result.response.unwrap_err();
        assert_eq!(error.code, "402");
        assert_eq!(error.message, "Card declined");
        assert_eq!(error.status_code, 200);
    }

    #[test]
    fn cancelled_transaction_is_a_decline() {
        let data = router_data::<Authorize, _, PaymentsResponseData>(true, authorize_data());
        let response = soap_response(
            "auth",
            "200",
            "OK",
            "<transaction><VID>vid-2</VID><statusLog><status>Cancelled</status>\
             <creditCardStatus><authCode>05</authCode></creditCardStatus></statusLog></transaction>",
        );

        let result = Vindicia::new().handle_response_v2(&data, response).unwrap();

        assert_eq!(
            result.resource_common_data.status,
            AttemptStatus::AuthorizationFailed
        );
        let error = result.response.unwrap_err();
        assert_eq!(error.code, "05");
        assert_eq!(error.message, "Transaction was declined");
        assert_eq!(error.connector_transaction_id.as_deref(), Some("vid-2"));
    }

    #[test]
    fn capture_and_void_read_the_batch_results() {
        let capture = router_data::<Capture, _, PaymentsResponseData>(
            true,
            PaymentsCaptureData {
                transaction_id: Some("tx-1".to_string()),
                transaction_reference: None,
            },
        );
        let (raw, _) = request_body(&capture).unwrap();
        assert!(raw.contains("<tns:capture><auth"));
        assert!(raw.contains("<transactions><merchantTransactionId>tx-1</merchantTransactionId></transactions>"));

        let response = soap_response(
            "capture",
            "200",
            "OK",
            "<qtySuccess>1</qtySuccess><qtyFail>0</qtyFail>\
             <results><returnCode>200</returnCode><VID>vid-1</VID></results>",
        );
        let result = Vindicia::new().handle_response_v2(&capture, response).unwrap();
        assert_eq!(result.resource_common_data.status, AttemptStatus::Charged);
        assert!(result.response.is_ok());

        let void = router_data::<Void, _, PaymentsResponseData>(
            true,
            PaymentVoidData {
                transaction_id: None,
                transaction_reference: Some("vid-1".to_string()),
            },
        );
        let response = soap_response(
            "cancel",
            "200",
            "OK",
            "<qtySuccess>0</qtySuccess><qtyFail>1</qtyFail>\
             <results><returnCode>400</returnCode><VID>vid-1</VID></results>",
        );
        let result = Vindicia::new().handle_response_v2(&void, response).unwrap();
        assert_eq!(result.resource_common_data.status, AttemptStatus::VoidFailed);
        let error = result.response.unwrap_err();
        assert_eq!(error.code, "400");
        assert_eq!(error.attempt_status, Some(AttemptStatus::VoidFailed));
    }

    #[test]
    fn capture_requires_a_transaction() {
        let capture = router_data::<Capture, _, PaymentsResponseData>(
            true,
            PaymentsCaptureData::default(),
        );
        assert_eq!(
            missing_field(&request_body(&capture).unwrap_err()),
            "transaction_id"
        );
    }

    fn subscription_data() -> SubscriptionData {
        SubscriptionData {
            subscription_id: Some("sub-1".to_string()),
            customer_id: Some("cust-1".to_string()),
            product_id: Some("prod-1".to_string()),
            plan_id: Some("plan-1".to_string()),
            currency: Some(Currency::EUR),
            card: Some(card()),
            ..Default::default()
        }
    }

    #[test]
    fn subscription_updates_tolerate_existing_autobills() {
        let create =
            router_data::<CreateSubscription, _, PaymentsResponseData>(true, subscription_data());
        let (raw, _) = request_body(&create).unwrap();
        assert!(raw.contains("<tns:update>"));
        assert!(raw.contains("<merchantAutoBillId>sub-1</merchantAutoBillId>"));
        assert!(raw.contains("<merchantBillingPlanId>plan-1</merchantBillingPlanId>"));
        assert!(raw.contains("<duplicateBehavior>Fail</duplicateBehavior>"));
        assert!(raw.contains("<validate>true</validate>"));

        let update = router_data::<CreateSubscription, _, PaymentsResponseData>(
            true,
            SubscriptionData {
                subscription_id: Some("sub-1".to_string()),
                is_update: true,
                ..Default::default()
            },
        );
        let (raw, _) = request_body(&update).unwrap();
        assert!(raw.contains("<duplicateBehavior>SucceedIgnore</duplicateBehavior>"));
        assert!(raw.contains("<validate>false</validate>"));
    }

    #[test]
    fn subscription_creation_requires_a_plan() {
        let create = router_data::<CreateSubscription, _, PaymentsResponseData>(
            true,
            SubscriptionData {
                plan_id: None,
                ..subscription_data()
            },
        );
        assert_eq!(missing_field(&request_body(&create).unwrap_err()), "plan_id");
    }

    #[test]
    fn payment_method_creation_validates_the_card() {
        let request = PaymentMethodRequestData {
            customer_id: Some("cust-1".to_string()),
            payment_method_id: Some("pm-1".to_string()),
            card: Some(card()),
            ..Default::default()
        };
        let data = router_data::<CreatePaymentMethod, _, PaymentsResponseData>(true, request);
        let (raw, _) = request_body(&data).unwrap();
        assert!(raw.contains("<tns:updatePaymentMethod>"));
        assert!(raw.contains("<updateBehavior>Validate</updateBehavior>"));
        assert!(raw.contains("<type>CreditCard</type>"));

        let response = soap_response(
            "updatePaymentMethod",
            "200",
            "OK",
            "<paymentMethod><VID>pm-vid</VID><merchantPaymentMethodId>pm-1</merchantPaymentMethodId>\
             </paymentMethod><validated>true</validated>",
        );
        let result = Vindicia::new().handle_response_v2(&data, response).unwrap();
        assert_eq!(result.resource_common_data.status, AttemptStatus::Authorized);

        let data = router_data::<CreatePaymentMethod, _, PaymentsResponseData>(
            true,
            PaymentMethodRequestData {
                customer_id: Some("cust-1".to_string()),
                payment_method_id: Some("pm-1".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(missing_field(&request_body(&data).unwrap_err()), "card");
    }

    fn refund_data(
        amount: Option<MinorUnit>,
        refund_items: RefundItemBag,
    ) -> RouterDataV2<Refund, RefundFlowData, RefundsData, RefundsResponseData> {
        RouterDataV2 {
            flow: PhantomData,
            resource_common_data: RefundFlowData {
                status: RefundStatus::Pending,
                test_mode: true,
                connectors: connectors(),
                soap_id: None,
            },
            connector_auth_type: ConnectorAuthType::BodyKey {
                api_key: Secret::new("soap-login".to_string()),
                key1: Secret::new(PASSWORD.to_string()),
            },
            request: RefundsData {
                refund_id: Some("rf-1".to_string()),
                transaction_id: Some("tx-1".to_string()),
                amount,
                currency: Currency::USD,
                refund_items,
                ..Default::default()
            },
            response: Err(ErrorResponse::default()),
        }
    }

    fn item_fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn refund_amount_defaults_to_the_items() {
        let mut refund_items = RefundItemBag::new();
        refund_items.add(RefundItem {
            sku: Some("w-1".to_string()),
            amount: Some(MinorUnit::new(250).into()),
            ..Default::default()
        });
        refund_items.add(item_fields(
            json!({ "sku": "g-1", "amount": 100, "taxOnly": true }),
        ));
        let data = refund_data(None, refund_items);

        let (raw, _) = request_body(&data).unwrap();
        assert!(raw.contains("<tns:perform>"));
        assert!(raw.contains("<amount>3.50</amount>"));
        let first = raw.find("<sku>w-1</sku>").unwrap();
        let second = raw.find("<sku>g-1</sku>").unwrap();
        assert!(first < second);
        assert!(raw.contains("<taxOnly>true</taxOnly>"));

        let response = soap_response(
            "perform",
            "200",
            "OK",
            "<refunds><VID>r-vid</VID><merchantRefundId>rf-1</merchantRefundId>\
             <status>Complete</status></refunds>",
        );
        let result = Vindicia::new().handle_response_v2(&data, response).unwrap();
        assert_eq!(result.resource_common_data.status, RefundStatus::Success);
        assert_eq!(
            result.response.unwrap().connector_refund_id.as_deref(),
            Some("r-vid")
        );
    }

    #[test]
    fn refund_items_accept_major_unit_amounts() {
        let refund_items: RefundItemBag = vec![
            item_fields(json!({ "sku": "w-1", "amount": "3.50" })),
            item_fields(json!({ "sku": "g-1", "amount": "1.25" })),
        ]
        .into_iter()
        .collect();

        let (raw, _) = request_body(&refund_data(None, refund_items)).unwrap();

        assert!(raw.contains("<amount>4.75</amount>"));
        assert!(raw.contains("<sku>w-1</sku><amount>3.50</amount>"));
    }

    #[test]
    fn refund_without_any_amount_is_rejected() {
        let refund_items: RefundItemBag = vec![
            item_fields(json!({ "sku": "w-1", "amount": 250 })),
            item_fields(json!({ "sku": "g-1", "transactionItemIndexNumber": 2 })),
        ]
        .into_iter()
        .collect();
        let data = refund_data(None, refund_items.clone());
        assert_eq!(missing_field(&request_body(&data).unwrap_err()), "amount");

        let data = refund_data(None, RefundItemBag::new());
        assert_eq!(missing_field(&request_body(&data).unwrap_err()), "amount");

        // an explicit amount covers items without one
        let data = refund_data(Some(MinorUnit::new(300)), refund_items);
        let (raw, _) = request_body(&data).unwrap();
        assert!(raw.contains("<amount>3.00</amount>"));
    }

    #[test]
    fn unreadable_refund_item_amounts_are_rejected() {
        let refund_items: RefundItemBag =
            vec![item_fields(json!({ "sku": "w-1", "amount": "3.50 USD" }))]
                .into_iter()
                .collect();

        let error = request_body(&refund_data(None, refund_items)).unwrap_err();
        assert_eq!(
            *error.current_context(),
            ConnectorError::AmountConversionFailed
        );
    }

    #[test]
    fn soap_faults_are_read_from_server_errors() {
        let response = Response {
            headers: None,
            response: bytes::Bytes::from_static(
                br#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <soap:Fault>
      <faultcode>soap:Server</faultcode>
      <faultstring>Internal error</faultstring>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#,
            ),
            status_code: 500,
        };

        let error = Vindicia::new().build_error_response(response).unwrap();

        assert_eq!(error.code, "soap:Server");
        assert_eq!(error.message, "Internal error");
        assert_eq!(error.status_code, 500);
    }
}
