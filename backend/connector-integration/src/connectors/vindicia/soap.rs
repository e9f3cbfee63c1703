//! SOAP envelope of the Vindicia API.

use common_utils::{CustomResult, RequestContent};
use domain_types::errors::ConnectorError;
use error_stack::{report, ResultExt};
use hyperswitch_masking::{ErasedMaskSerialize, Secret};
use serde::Serialize;

use crate::utils::XmlElement;

pub const API_VERSION: &str = "18.0";
pub const ENDPOINT_PATH: &str = "soap.pl";

const NAMESPACE_ROOT: &str = "http://soap.vindicia.com/v18_0";
const SOAP_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum VindiciaObject {
    Transaction,
    AutoBill,
    Account,
    Refund,
}

/// A method of a Vindicia object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoapCall {
    pub object: VindiciaObject,
    pub method: &'static str,
}

impl SoapCall {
    pub const TRANSACTION_AUTH: Self = Self::new(VindiciaObject::Transaction, "auth");
    pub const TRANSACTION_AUTH_CAPTURE: Self =
        Self::new(VindiciaObject::Transaction, "authCapture");
    pub const TRANSACTION_CAPTURE: Self = Self::new(VindiciaObject::Transaction, "capture");
    pub const TRANSACTION_CANCEL: Self = Self::new(VindiciaObject::Transaction, "cancel");
    pub const AUTOBILL_UPDATE: Self = Self::new(VindiciaObject::AutoBill, "update");
    pub const ACCOUNT_UPDATE_PAYMENT_METHOD: Self =
        Self::new(VindiciaObject::Account, "updatePaymentMethod");
    pub const ACCOUNT_UPDATE: Self = Self::new(VindiciaObject::Account, "update");
    pub const REFUND_PERFORM: Self = Self::new(VindiciaObject::Refund, "perform");

    const fn new(object: VindiciaObject, method: &'static str) -> Self {
        Self { object, method }
    }

    pub fn namespace(&self) -> String {
        format!("{NAMESPACE_ROOT}/{}", self.object)
    }

    /// Value of the `SOAPAction` header, quoted.
    pub fn soap_action(&self) -> String {
        format!("\"{}#{}\"", self.namespace(), self.method)
    }

    fn root_tag(&self) -> String {
        format!("tns:{}", self.method)
    }
}

impl std::fmt::Display for SoapCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.object, self.method)
    }
}

/// Wraps the parameters of `call` into a SOAP 1.1 envelope.
///
/// The logged form of the body is the masked JSON rendering of the parameters.
pub fn build_envelope<T: Serialize>(
    call: SoapCall,
    parameters: &T,
) -> CustomResult<RequestContent, ConnectorError> {
    let body = quick_xml::se::to_string_with_root(&call.root_tag(), parameters)
        .change_context(ConnectorError::RequestEncodingFailed)
        .attach_printable_lazy(|| format!("failed to serialize the parameters of {call}"))?;

    let envelope = format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soap:Envelope xmlns:soap="{soap}" xmlns:xsi="{xsi}" xmlns:xsd="{xsd}" "#,
            r#"xmlns:vin="{vin}" xmlns:tns="{tns}">"#,
            "<soap:Body>{body}</soap:Body>",
            "</soap:Envelope>"
        ),
        soap = SOAP_ENVELOPE_NAMESPACE,
        xsi = XSI_NAMESPACE,
        xsd = XSD_NAMESPACE,
        vin = format!("{NAMESPACE_ROOT}/Vindicia"),
        tns = call.namespace(),
        body = body,
    );

    let masked = parameters
        .masked_serialize()
        .map(|masked| serde_json::json!({ "call": call.to_string(), "parameters": masked }))
        .unwrap_or_else(|_| serde_json::json!({ "error": "failed to mask serialize connector request" }))
        .to_string();

    Ok(RequestContent::Xml {
        raw: Secret::new(envelope),
        masked,
    })
}

/// The `return` element every Vindicia method answers with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VindiciaReturn {
    pub return_code: String,
    pub return_string: Option<String>,
    pub soap_id: Option<String>,
}

impl VindiciaReturn {
    pub const SUCCESS_CODE: &'static str = "200";

    pub fn is_success(&self) -> bool {
        self.return_code == Self::SUCCESS_CODE
    }
}

/// The `<method>Response` element of an answer together with its `return`.
#[derive(Clone, Debug)]
pub struct SoapResponse {
    pub soap_return: VindiciaReturn,
    pub body: XmlElement,
}

impl SoapResponse {
    pub fn parse(bytes: &[u8]) -> CustomResult<Self, ConnectorError> {
        let envelope = XmlElement::parse(bytes)?;

        let body = envelope
            .children
            .into_iter()
            .find(|element| element.name == "Body")
            .ok_or_else(|| {
                report!(ConnectorError::ResponseDeserializationFailed)
                    .attach_printable("SOAP envelope has no body")
            })?;

        if let Some(fault) = body.child("Fault") {
            return Err(report!(ConnectorError::ResponseDeserializationFailed).attach_printable(
                format!(
                    "SOAP fault {}",
                    fault.child_text("faultstring").unwrap_or_default()
                ),
            ));
        }

        let response = body.children.into_iter().next().ok_or_else(|| {
            report!(ConnectorError::ResponseDeserializationFailed)
                .attach_printable("SOAP body is empty")
        })?;

        let soap_return = response
            .child("return")
            .and_then(|element| {
                Some(VindiciaReturn {
                    return_code: element.child_string("returnCode")?,
                    return_string: element.child_string("returnString"),
                    soap_id: element.child_string("soapId"),
                })
            })
            .ok_or_else(|| {
                report!(ConnectorError::ResponseDeserializationFailed)
                    .attach_printable("response has no return code")
            })?;

        Ok(Self {
            soap_return,
            body: response,
        })
    }
}

/// A SOAP fault, sent by the server with an HTTP 500.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_string: Option<String>,
}

impl SoapFault {
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let envelope = XmlElement::parse(bytes).ok()?;
        let fault = envelope.find("Fault")?;
        Some(Self {
            fault_code: fault.child_string("faultcode")?,
            fault_string: fault.child_string("faultstring"),
        })
    }
}
