use common_enums::{AttemptStatus, Currency, RefundStatus};
use common_utils::MinorUnit;
use hyperswitch_masking::Secret;
use serde_json::{Map, Value};

use crate::{payment_method_data::Card, refund_items::RefundItemBag, types::Connectors};

/// Data shared by every payment, subscription, payment method and customer flow.
#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    pub status: AttemptStatus,
    pub test_mode: bool,
    pub connectors: Connectors,
    /// Identifier the connector assigned to the last SOAP call.
    pub soap_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RefundFlowData {
    pub status: RefundStatus,
    pub test_mode: bool,
    pub connectors: Connectors,
    pub soap_id: Option<String>,
}

/// A priced entry of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionItem {
    pub name: String,
    pub sku: String,
    /// Unit price in minor units.
    pub price: MinorUnit,
    pub quantity: u32,
}

/// Input of the authorize and purchase flows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentsAuthorizeData {
    /// Merchant assigned transaction id.
    pub transaction_id: Option<String>,
    /// Total in minor units. May be left out when `items` are given.
    pub amount: Option<MinorUnit>,
    pub currency: Currency,
    pub items: Vec<TransactionItem>,
    /// Merchant assigned customer id.
    pub customer_id: Option<String>,
    /// Connector assigned customer id.
    pub customer_reference: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<Secret<String>>,
    pub card: Option<Card>,
    /// Merchant assigned id for the payment method used.
    pub payment_method_id: Option<String>,
    /// Connector assigned id of a stored payment method.
    pub payment_method_reference: Option<String>,
    /// Free form attributes sent as name/value pairs.
    pub attributes: Map<String, Value>,
    pub client_ip: Option<String>,
    pub statement_descriptor: Option<String>,
    /// Transactions scored above this chargeback probability are refused.
    pub min_chargeback_probability: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentsCaptureData {
    pub transaction_id: Option<String>,
    pub transaction_reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentVoidData {
    pub transaction_id: Option<String>,
    pub transaction_reference: Option<String>,
}

/// Input of the subscription flow, shared by create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionData {
    pub subscription_id: Option<String>,
    pub subscription_reference: Option<String>,
    pub customer_id: Option<String>,
    pub customer_reference: Option<String>,
    pub product_id: Option<String>,
    pub plan_id: Option<String>,
    pub currency: Option<Currency>,
    pub card: Option<Card>,
    pub payment_method_id: Option<String>,
    pub payment_method_reference: Option<String>,
    pub attributes: Map<String, Value>,
    pub statement_descriptor: Option<String>,
    pub min_chargeback_probability: Option<u8>,
    /// Set by the gateway: `true` when an existing subscription is being updated.
    pub is_update: bool,
}

/// Input of the payment method flow, shared by create and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentMethodRequestData {
    pub customer_id: Option<String>,
    pub customer_reference: Option<String>,
    pub payment_method_id: Option<String>,
    pub payment_method_reference: Option<String>,
    pub card: Option<Card>,
    pub attributes: Map<String, Value>,
    /// Also replace the payment method on every subscription of the customer.
    pub replace_on_all_subscriptions: bool,
    /// Set by the gateway: `true` when an existing payment method is being updated.
    pub is_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerData {
    pub customer_id: Option<String>,
    pub customer_reference: Option<String>,
    pub name: Option<String>,
    pub email: Option<Secret<String>>,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefundsData {
    pub refund_id: Option<String>,
    pub transaction_id: Option<String>,
    pub transaction_reference: Option<String>,
    /// Amount in minor units. Defaults to the sum of `refund_items`.
    pub amount: Option<MinorUnit>,
    pub currency: Currency,
    pub note: Option<String>,
    pub refund_items: RefundItemBag,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseId {
    ConnectorTransactionId(String),
    NoResponseId,
}

impl ResponseId {
    pub fn get_connector_transaction_id(&self) -> Option<&str> {
        match self {
            Self::ConnectorTransactionId(id) => Some(id),
            Self::NoResponseId => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentsResponseData {
    TransactionResponse {
        resource_id: ResponseId,
        merchant_transaction_id: Option<String>,
        risk_score: Option<i64>,
    },
    SubscriptionResponse {
        subscription_reference: Option<String>,
        subscription_id: Option<String>,
        subscription_status: Option<String>,
        created: Option<bool>,
    },
    PaymentMethodResponse {
        payment_method_reference: Option<String>,
        payment_method_id: Option<String>,
        validated: Option<bool>,
        risk_score: Option<i64>,
    },
    CustomerResponse {
        customer_reference: Option<String>,
        customer_id: Option<String>,
        created: Option<bool>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefundsResponseData {
    pub connector_refund_id: Option<String>,
    pub refund_id: Option<String>,
    pub refund_status: RefundStatus,
}
