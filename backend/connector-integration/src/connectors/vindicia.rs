pub mod name_value;
pub mod soap;
pub mod transformers;

#[cfg(test)]
mod test;

use common_enums::CurrencyUnit;
use common_utils::{
    consts::NO_ERROR_MESSAGE, errors::CustomResult, AmountConvertor, StringMajorUnit,
    StringMajorUnitForConnector,
};
use domain_types::{
    connector_flow::{
        Authorize, Capture, CreateCustomer, CreatePaymentMethod, CreateSubscription, Purchase,
        Refund, Void,
    },
    connector_types::{
        CustomerData, PaymentFlowData, PaymentMethodRequestData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData, RefundFlowData,
        RefundsData, RefundsResponseData, SubscriptionData,
    },
    errors,
    router_data::ErrorResponse,
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Connectors,
};
use hyperswitch_masking::Maskable;
use interfaces::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};
use soap::{SoapCall, SoapFault, SoapResponse};
use transformers::{
    AccountUpdateRequest, AutoBillUpdateRequest, RefundPerformRequest, TransactionAuthCaptureRequest,
    TransactionAuthRequest, TransactionBatchRequest, UpdatePaymentMethodRequest,
    VindiciaAccountResponse, VindiciaAutoBillResponse, VindiciaBatchResponse,
    VindiciaPaymentMethodResponse, VindiciaRefundResponse, VindiciaRouterData,
    VindiciaTransactionResponse,
};

use super::macros;
use crate::types::ResponseRouterData;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const SOAP_ACTION: &str = "SOAPAction";
}

macros::expand_imports!();

#[derive(Clone)]
pub struct Vindicia {
    pub(crate) amount_converter: &'static (dyn AmountConvertor<Output = StringMajorUnit> + Sync),
}

impl Vindicia {
    pub const fn new() -> &'static Self {
        &Self {
            amount_converter: &StringMajorUnitForConnector,
        }
    }

    pub fn build_headers<F, FCD, Req, Res>(
        &self,
        _req: &RouterDataV2<F, FCD, Req, Res>,
        call: SoapCall,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        Ok(vec![
            (
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            ),
            (headers::SOAP_ACTION.to_string(), call.soap_action().into()),
        ])
    }
}

impl ConnectorCommon for Vindicia {
    fn id(&self) -> &'static str {
        "vindicia"
    }

    fn get_currency_unit(&self) -> CurrencyUnit {
        CurrencyUnit::Base
    }

    fn common_get_content_type(&self) -> &'static str {
        "text/xml; charset=utf-8"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.vindicia.select_base_url(test_mode)
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let raw_connector_response = Some(String::from_utf8_lossy(&res.response).into_owned());

        if let Some(fault) = SoapFault::parse(&res.response) {
            tracing::warn!(
                fault_code = %fault.fault_code,
                status_code = res.status_code,
                "connector answered with a SOAP fault"
            );
            return Ok(ErrorResponse {
                code: fault.fault_code,
                message: fault
                    .fault_string
                    .clone()
                    .unwrap_or_else(|| NO_ERROR_MESSAGE.to_string()),
                reason: fault.fault_string,
                status_code: res.status_code,
                attempt_status: Some(common_enums::AttemptStatus::Failure),
                connector_transaction_id: None,
                raw_connector_response,
            });
        }

        match SoapResponse::parse(&res.response) {
            Ok(response) => Ok(ErrorResponse {
                message: response
                    .soap_return
                    .return_string
                    .clone()
                    .unwrap_or_else(|| NO_ERROR_MESSAGE.to_string()),
                code: response.soap_return.return_code,
                reason: response.soap_return.return_string,
                status_code: res.status_code,
                attempt_status: Some(common_enums::AttemptStatus::Failure),
                connector_transaction_id: None,
                raw_connector_response,
            }),
            Err(_parsing_error) => Ok(ErrorResponse {
                status_code: res.status_code,
                reason: raw_connector_response.clone(),
                attempt_status: Some(common_enums::AttemptStatus::Failure),
                raw_connector_response,
                ..Default::default()
            }),
        }
    }
}

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_url],
    connector: Vindicia,
    soap_call: SoapCall::TRANSACTION_AUTH,
    curl_request: TransactionAuthRequest,
    curl_response: VindiciaTransactionResponse,
    flow_name: Authorize,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentsAuthorizeData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {}
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_url],
    connector: Vindicia,
    soap_call: SoapCall::TRANSACTION_AUTH_CAPTURE,
    curl_request: TransactionAuthCaptureRequest,
    curl_response: VindiciaTransactionResponse,
    flow_name: Purchase,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentsAuthorizeData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {}
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_url],
    connector: Vindicia,
    soap_call: SoapCall::TRANSACTION_CAPTURE,
    curl_request: TransactionBatchRequest,
    curl_response: VindiciaBatchResponse,
    flow_name: Capture,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentsCaptureData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {}
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_url],
    connector: Vindicia,
    soap_call: SoapCall::TRANSACTION_CANCEL,
    curl_request: TransactionBatchRequest,
    curl_response: VindiciaBatchResponse,
    flow_name: Void,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentVoidData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {}
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_url],
    connector: Vindicia,
    soap_call: SoapCall::AUTOBILL_UPDATE,
    curl_request: AutoBillUpdateRequest,
    curl_response: VindiciaAutoBillResponse,
    flow_name: CreateSubscription,
    resource_common_data: PaymentFlowData,
    flow_request: SubscriptionData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {}
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_url],
    connector: Vindicia,
    soap_call: SoapCall::ACCOUNT_UPDATE_PAYMENT_METHOD,
    curl_request: UpdatePaymentMethodRequest,
    curl_response: VindiciaPaymentMethodResponse,
    flow_name: CreatePaymentMethod,
    resource_common_data: PaymentFlowData,
    flow_request: PaymentMethodRequestData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {}
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_url],
    connector: Vindicia,
    soap_call: SoapCall::ACCOUNT_UPDATE,
    curl_request: AccountUpdateRequest,
    curl_response: VindiciaAccountResponse,
    flow_name: CreateCustomer,
    resource_common_data: PaymentFlowData,
    flow_request: CustomerData,
    flow_response: PaymentsResponseData,
    http_method: Post,
    other_functions: {}
);

macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_url],
    connector: Vindicia,
    soap_call: SoapCall::REFUND_PERFORM,
    curl_request: RefundPerformRequest,
    curl_response: VindiciaRefundResponse,
    flow_name: Refund,
    resource_common_data: RefundFlowData,
    flow_request: RefundsData,
    flow_response: RefundsResponseData,
    http_method: Post,
    other_functions: {}
);
