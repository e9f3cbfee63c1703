use std::str::FromStr;

use common_enums::{AttemptStatus, Currency, RefundStatus};
use common_utils::{
    consts::NO_ERROR_MESSAGE,
    fp_utils::when,
    types::{AmountConvertor, MinorUnit, StringMajorUnit},
    CustomResult,
};
use domain_types::{
    connector_types::{
        CustomerData, PaymentFlowData, PaymentMethodRequestData, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsResponseData, RefundFlowData,
        RefundsData, RefundsResponseData, ResponseId, SubscriptionData, TransactionItem,
    },
    errors::ConnectorError,
    payment_method_data::Card,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_data_v2::RouterDataV2,
    utils::missing_field_err,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::Secret;
use serde::Serialize;
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

use super::{
    name_value::{NameValue, SoapNameValue},
    soap::{SoapResponse, VindiciaReturn, API_VERSION},
};
use crate::{types::ResponseRouterData, utils::XmlElement};

const USER_AGENT: &str = concat!("vindicia-connector/", env!("CARGO_PKG_VERSION"));
const CREDIT_CARD: &str = "CreditCard";
const CVN: &str = "CVN";
/// Chargeback probability at or above which Vindicia refuses a transaction; 100 disables
/// the check.
const DEFAULT_MIN_CHARGEBACK_PROBABILITY: u8 = 100;

pub struct VindiciaRouterData<'a, T> {
    pub amount_converter: &'a (dyn AmountConvertor<Output = StringMajorUnit> + Sync),
    pub router_data: &'a T,
}

impl<'a, T> VindiciaRouterData<'a, T> {
    fn convert_amount(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> CustomResult<String, ConnectorError> {
        self.amount_converter
            .convert(amount, currency)
            .change_context(ConnectorError::AmountConversionFailed)
            .map(|amount| amount.get_amount_as_string())
    }
}

#[derive(Debug, Clone)]
pub struct VindiciaAuthType {
    pub(super) login: Secret<String>,
    pub(super) password: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for VindiciaAuthType {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                login: api_key.to_owned(),
                password: key1.to_owned(),
            }),
            ConnectorAuthType::NoKey => Err(report!(ConnectorError::FailedToObtainAuthType)),
        }
    }
}

// Request types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authentication {
    #[serde(rename = "@xsi:type")]
    xsi_type: &'static str,
    login: Secret<String>,
    password: Secret<String>,
    version: &'static str,
    user_agent: &'static str,
}

impl TryFrom<&ConnectorAuthType> for Authentication {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        let auth = VindiciaAuthType::try_from(auth_type)?;
        Ok(Self {
            xsi_type: "vin:Authentication",
            login: auth.login,
            password: auth.password,
            version: API_VERSION,
            user_agent: USER_AGENT,
        })
    }
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaAccount {
    #[serde(rename = "VID")]
    vid: Option<String>,
    merchant_account_id: Option<String>,
    name: Option<String>,
    email_address: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    name_values: Vec<SoapNameValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaCreditCard {
    account: Secret<String>,
    expiration_date: Secret<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaAddress {
    postal_code: Option<Secret<String>>,
    country: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaPaymentMethod {
    #[serde(rename = "VID")]
    vid: Option<String>,
    merchant_payment_method_id: Option<String>,
    #[serde(rename = "type")]
    payment_method_type: Option<&'static str>,
    credit_card: Option<VindiciaCreditCard>,
    account_holder_name: Option<Secret<String>>,
    billing_address: Option<VindiciaAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    name_values: Vec<SoapNameValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaTransactionItem {
    sku: String,
    name: String,
    price: String,
    quantity: u32,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaTransaction {
    #[serde(rename = "VID")]
    vid: Option<String>,
    merchant_transaction_id: Option<String>,
    amount: Option<String>,
    currency: Option<Currency>,
    account: Option<VindiciaAccount>,
    source_payment_method: Option<VindiciaPaymentMethod>,
    source_ip: Option<String>,
    billing_statement_identifier: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    transaction_items: Vec<VindiciaTransactionItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    name_values: Vec<SoapNameValue>,
}

/// Parameters of `Transaction.auth`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAuthRequest {
    auth: Authentication,
    transaction: VindiciaTransaction,
    min_chargeback_probability: u8,
    send_email_notification: bool,
    ignore_avs_policy: bool,
    ignore_cvn_policy: bool,
}

/// Parameters of `Transaction.authCapture`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAuthCaptureRequest {
    auth: Authentication,
    transaction: VindiciaTransaction,
    send_email_notification: bool,
    ignore_avs_policy: bool,
    ignore_cvn_policy: bool,
    dryrun: bool,
}

/// Parameters of `Transaction.capture` and `Transaction.cancel`.
#[derive(Debug, Serialize)]
pub struct TransactionBatchRequest {
    auth: Authentication,
    transactions: Vec<VindiciaTransaction>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaProduct {
    merchant_product_id: String,
}

#[derive(Debug, Serialize)]
pub struct VindiciaAutoBillItem {
    product: VindiciaProduct,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaBillingPlan {
    merchant_billing_plan_id: String,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaAutoBill {
    #[serde(rename = "VID")]
    vid: Option<String>,
    merchant_auto_bill_id: Option<String>,
    account: Option<VindiciaAccount>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    items: Vec<VindiciaAutoBillItem>,
    billing_plan: Option<VindiciaBillingPlan>,
    payment_method: Option<VindiciaPaymentMethod>,
    currency: Option<Currency>,
    billing_statement_identifier: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    name_values: Vec<SoapNameValue>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DuplicateBehavior {
    /// A subscription with the same id is an error.
    Fail,
    /// A subscription with the same id is updated.
    SucceedIgnore,
}

/// Parameters of `AutoBill.update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoBillUpdateRequest {
    auth: Authentication,
    autobill: VindiciaAutoBill,
    duplicate_behavior: DuplicateBehavior,
    validate: bool,
    min_chargeback_probability: u8,
    ignore_avs_policy: bool,
    ignore_cvn_policy: bool,
    dryrun: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PaymentMethodUpdateBehavior {
    /// Validate the card before storing it.
    Validate,
    /// Store the changes without validation.
    Update,
}

/// Parameters of `Account.updatePaymentMethod`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentMethodRequest {
    auth: Authentication,
    account: VindiciaAccount,
    payment_method: VindiciaPaymentMethod,
    replace_on_all_auto_bills: bool,
    update_behavior: PaymentMethodUpdateBehavior,
    ignore_avs_policy: bool,
    ignore_cvn_policy: bool,
}

/// Parameters of `Account.update`.
#[derive(Debug, Serialize)]
pub struct AccountUpdateRequest {
    auth: Authentication,
    account: VindiciaAccount,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaRefundItem {
    sku: Option<String>,
    amount: Option<String>,
    transaction_item_index_number: Option<u64>,
    tax_only: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VindiciaRefund {
    merchant_refund_id: Option<String>,
    transaction: VindiciaTransaction,
    amount: Option<String>,
    currency: Currency,
    note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    refund_items: Vec<VindiciaRefundItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    name_values: Vec<SoapNameValue>,
}

/// Parameters of `Refund.perform`.
#[derive(Debug, Serialize)]
pub struct RefundPerformRequest {
    auth: Authentication,
    refunds: Vec<VindiciaRefund>,
}

// Request builders

fn name_values(attributes: &Map<String, Value>) -> CustomResult<Vec<SoapNameValue>, ConnectorError> {
    Ok(NameValue::from_attributes(attributes)?
        .iter()
        .map(SoapNameValue::from)
        .collect())
}

fn account(
    customer_id: Option<&String>,
    customer_reference: Option<&String>,
) -> Option<VindiciaAccount> {
    (customer_id.is_some() || customer_reference.is_some()).then(|| VindiciaAccount {
        vid: customer_reference.cloned(),
        merchant_account_id: customer_id.cloned(),
        ..Default::default()
    })
}

fn payment_method(
    card: Option<&Card>,
    payment_method_id: Option<&String>,
    payment_method_reference: Option<&String>,
    attributes: Vec<SoapNameValue>,
) -> VindiciaPaymentMethod {
    let reference = VindiciaPaymentMethod {
        vid: payment_method_reference.cloned(),
        merchant_payment_method_id: payment_method_id.cloned(),
        name_values: attributes,
        ..Default::default()
    };

    match card {
        None => reference,
        Some(card) => {
            let mut name_values = reference.name_values;
            if let Some(cvv) = card.cvv.as_ref() {
                name_values.push(SoapNameValue::sensitive(CVN, cvv.clone()));
            }
            let billing_address = (card.postcode.is_some() || card.country.is_some()).then(|| {
                VindiciaAddress {
                    postal_code: card.postcode.clone(),
                    country: card.country.clone(),
                }
            });

            VindiciaPaymentMethod {
                payment_method_type: Some(CREDIT_CARD),
                credit_card: Some(VindiciaCreditCard {
                    account: card.number.clone(),
                    expiration_date: card.get_expiry_date_as_yyyymm(),
                }),
                account_holder_name: card.holder_name.clone(),
                billing_address,
                name_values,
                ..reference
            }
        }
    }
}

fn has_payment_method(
    card: Option<&Card>,
    payment_method_id: Option<&String>,
    payment_method_reference: Option<&String>,
) -> bool {
    card.is_some() || payment_method_id.is_some() || payment_method_reference.is_some()
}

fn require_either(
    first: Option<&String>,
    second: Option<&String>,
    field_name: &'static str,
) -> CustomResult<(), ConnectorError> {
    first
        .or(second)
        .map(|_| ())
        .ok_or_else(missing_field_err(field_name))
}

fn items_total(items: &[TransactionItem]) -> CustomResult<MinorUnit, ConnectorError> {
    items
        .iter()
        .try_fold(MinorUnit::zero(), |total, item| {
            item.price
                .checked_mul(item.quantity)
                .and_then(|line| total.checked_add(line))
        })
        .ok_or_else(|| {
            report!(ConnectorError::InvalidRequestData {
                message: "item total overflows the amount range".to_string(),
            })
        })
}

fn build_transaction<F>(
    data: &VindiciaRouterData<
        '_,
        RouterDataV2<F, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
    >,
) -> CustomResult<VindiciaTransaction, ConnectorError> {
    let request = &data.router_data.request;

    let transaction_id = request
        .transaction_id
        .clone()
        .ok_or_else(missing_field_err("transaction_id"))?;
    let amount = match (request.amount, request.items.is_empty()) {
        (None, true) => Err(missing_field_err("amount")())?,
        (Some(amount), true) => amount,
        (Some(amount), false) => {
            let total = items_total(&request.items)?;
            when(amount != total, || {
                Err(report!(ConnectorError::InvalidRequestData {
                    message: format!("amount {amount} does not match the item total {total}"),
                }))
            })?;
            amount
        }
        (None, false) => items_total(&request.items)?,
    };
    require_either(
        request.customer_id.as_ref(),
        request.customer_reference.as_ref(),
        "customer_id",
    )?;
    when(
        !has_payment_method(
            request.card.as_ref(),
            request.payment_method_id.as_ref(),
            request.payment_method_reference.as_ref(),
        ),
        || Err(missing_field_err("card")()),
    )?;

    let transaction_items = request
        .items
        .iter()
        .map(|item| {
            Ok(VindiciaTransactionItem {
                sku: item.sku.clone(),
                name: item.name.clone(),
                price: data.convert_amount(item.price, request.currency)?,
                quantity: item.quantity,
            })
        })
        .collect::<CustomResult<Vec<_>, ConnectorError>>()?;

    Ok(VindiciaTransaction {
        merchant_transaction_id: Some(transaction_id),
        amount: Some(data.convert_amount(amount, request.currency)?),
        currency: Some(request.currency),
        account: Some(VindiciaAccount {
            vid: request.customer_reference.clone(),
            merchant_account_id: request.customer_id.clone(),
            name: request.customer_name.clone(),
            email_address: request.email.clone(),
            name_values: Vec::new(),
        }),
        source_payment_method: Some(payment_method(
            request.card.as_ref(),
            request.payment_method_id.as_ref(),
            request.payment_method_reference.as_ref(),
            Vec::new(),
        )),
        source_ip: request.client_ip.clone(),
        billing_statement_identifier: request.statement_descriptor.clone(),
        transaction_items,
        name_values: name_values(&request.attributes)?,
        ..Default::default()
    })
}

impl<F>
    TryFrom<
        VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for TransactionAuthRequest
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        data: VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let transaction = build_transaction(&data)?;
        Ok(Self {
            auth: Authentication::try_from(&data.router_data.connector_auth_type)?,
            transaction,
            min_chargeback_probability: data
                .router_data
                .request
                .min_chargeback_probability
                .unwrap_or(DEFAULT_MIN_CHARGEBACK_PROBABILITY),
            send_email_notification: false,
            ignore_avs_policy: false,
            ignore_cvn_policy: false,
        })
    }
}

impl<F>
    TryFrom<
        VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    > for TransactionAuthCaptureRequest
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        data: VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentsAuthorizeData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let transaction = build_transaction(&data)?;
        Ok(Self {
            auth: Authentication::try_from(&data.router_data.connector_auth_type)?,
            transaction,
            send_email_notification: false,
            ignore_avs_policy: false,
            ignore_cvn_policy: false,
            dryrun: false,
        })
    }
}

fn transaction_reference(
    transaction_id: Option<&String>,
    transaction_reference: Option<&String>,
) -> CustomResult<VindiciaTransaction, ConnectorError> {
    require_either(transaction_id, transaction_reference, "transaction_id")?;
    Ok(VindiciaTransaction {
        vid: transaction_reference.cloned(),
        merchant_transaction_id: transaction_id.cloned(),
        ..Default::default()
    })
}

impl<F>
    TryFrom<
        VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    > for TransactionBatchRequest
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        data: VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &data.router_data.request;
        Ok(Self {
            auth: Authentication::try_from(&data.router_data.connector_auth_type)?,
            transactions: vec![transaction_reference(
                request.transaction_id.as_ref(),
                request.transaction_reference.as_ref(),
            )?],
        })
    }
}

impl<F>
    TryFrom<
        VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    > for TransactionBatchRequest
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        data: VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentVoidData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &data.router_data.request;
        Ok(Self {
            auth: Authentication::try_from(&data.router_data.connector_auth_type)?,
            transactions: vec![transaction_reference(
                request.transaction_id.as_ref(),
                request.transaction_reference.as_ref(),
            )?],
        })
    }
}

impl<F>
    TryFrom<
        VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, SubscriptionData, PaymentsResponseData>,
        >,
    > for AutoBillUpdateRequest
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        data: VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, SubscriptionData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &data.router_data.request;

        if request.is_update {
            require_either(
                request.subscription_id.as_ref(),
                request.subscription_reference.as_ref(),
                "subscription_id",
            )?;
        } else {
            request
                .subscription_id
                .as_ref()
                .ok_or_else(missing_field_err("subscription_id"))?;
            require_either(
                request.customer_id.as_ref(),
                request.customer_reference.as_ref(),
                "customer_id",
            )?;
            request
                .product_id
                .as_ref()
                .ok_or_else(missing_field_err("product_id"))?;
            request
                .plan_id
                .as_ref()
                .ok_or_else(missing_field_err("plan_id"))?;
            if !has_payment_method(
                request.card.as_ref(),
                request.payment_method_id.as_ref(),
                request.payment_method_reference.as_ref(),
            ) {
                return Err(missing_field_err("card")());
            }
        }

        let payment_method = has_payment_method(
            request.card.as_ref(),
            request.payment_method_id.as_ref(),
            request.payment_method_reference.as_ref(),
        )
        .then(|| {
            payment_method(
                request.card.as_ref(),
                request.payment_method_id.as_ref(),
                request.payment_method_reference.as_ref(),
                Vec::new(),
            )
        });

        let autobill = VindiciaAutoBill {
            vid: request.subscription_reference.clone(),
            merchant_auto_bill_id: request.subscription_id.clone(),
            account: account(
                request.customer_id.as_ref(),
                request.customer_reference.as_ref(),
            ),
            items: request
                .product_id
                .iter()
                .map(|product_id| VindiciaAutoBillItem {
                    product: VindiciaProduct {
                        merchant_product_id: product_id.clone(),
                    },
                })
                .collect(),
            billing_plan: request
                .plan_id
                .clone()
                .map(|merchant_billing_plan_id| VindiciaBillingPlan {
                    merchant_billing_plan_id,
                }),
            payment_method,
            currency: request.currency,
            billing_statement_identifier: request.statement_descriptor.clone(),
            name_values: name_values(&request.attributes)?,
        };

        Ok(Self {
            auth: Authentication::try_from(&data.router_data.connector_auth_type)?,
            autobill,
            duplicate_behavior: if request.is_update {
                DuplicateBehavior::SucceedIgnore
            } else {
                DuplicateBehavior::Fail
            },
            validate: !request.is_update || request.card.is_some(),
            min_chargeback_probability: request
                .min_chargeback_probability
                .unwrap_or(DEFAULT_MIN_CHARGEBACK_PROBABILITY),
            ignore_avs_policy: false,
            ignore_cvn_policy: false,
            dryrun: false,
        })
    }
}

impl<F>
    TryFrom<
        VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentMethodRequestData, PaymentsResponseData>,
        >,
    > for UpdatePaymentMethodRequest
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        data: VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, PaymentMethodRequestData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &data.router_data.request;

        if request.is_update {
            require_either(
                request.payment_method_id.as_ref(),
                request.payment_method_reference.as_ref(),
                "payment_method_id",
            )?;
        } else {
            require_either(
                request.customer_id.as_ref(),
                request.customer_reference.as_ref(),
                "customer_id",
            )?;
            request
                .payment_method_id
                .as_ref()
                .ok_or_else(missing_field_err("payment_method_id"))?;
            request
                .card
                .as_ref()
                .ok_or_else(missing_field_err("card"))?;
        }

        Ok(Self {
            auth: Authentication::try_from(&data.router_data.connector_auth_type)?,
            account: account(
                request.customer_id.as_ref(),
                request.customer_reference.as_ref(),
            )
            .unwrap_or_default(),
            payment_method: payment_method(
                request.card.as_ref(),
                request.payment_method_id.as_ref(),
                request.payment_method_reference.as_ref(),
                name_values(&request.attributes)?,
            ),
            replace_on_all_auto_bills: request.replace_on_all_subscriptions,
            update_behavior: if request.is_update {
                PaymentMethodUpdateBehavior::Update
            } else {
                PaymentMethodUpdateBehavior::Validate
            },
            ignore_avs_policy: false,
            ignore_cvn_policy: false,
        })
    }
}

impl<F>
    TryFrom<
        VindiciaRouterData<'_, RouterDataV2<F, PaymentFlowData, CustomerData, PaymentsResponseData>>,
    > for AccountUpdateRequest
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        data: VindiciaRouterData<
            '_,
            RouterDataV2<F, PaymentFlowData, CustomerData, PaymentsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &data.router_data.request;
        let customer_id = request
            .customer_id
            .clone()
            .ok_or_else(missing_field_err("customer_id"))?;

        Ok(Self {
            auth: Authentication::try_from(&data.router_data.connector_auth_type)?,
            account: VindiciaAccount {
                vid: request.customer_reference.clone(),
                merchant_account_id: Some(customer_id),
                name: request.name.clone(),
                email_address: request.email.clone(),
                name_values: name_values(&request.attributes)?,
            },
        })
    }
}

impl<F>
    TryFrom<VindiciaRouterData<'_, RouterDataV2<F, RefundFlowData, RefundsData, RefundsResponseData>>>
    for RefundPerformRequest
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        data: VindiciaRouterData<
            '_,
            RouterDataV2<F, RefundFlowData, RefundsData, RefundsResponseData>,
        >,
    ) -> Result<Self, Self::Error> {
        let request = &data.router_data.request;
        let transaction = transaction_reference(
            request.transaction_id.as_ref(),
            request.transaction_reference.as_ref(),
        )?;
        let items_total = request
            .refund_items
            .total_amount(request.currency)
            .change_context(ConnectorError::AmountConversionFailed)?;
        // without an amount Vindicia refunds the whole transaction
        let amount = request
            .amount
            .or(items_total)
            .ok_or_else(missing_field_err("amount"))?;
        let amount = Some(data.convert_amount(amount, request.currency)?);
        let refund_items = request
            .refund_items
            .iter()
            .map(|item| {
                Ok(VindiciaRefundItem {
                    sku: item.sku.clone(),
                    amount: item
                        .amount
                        .as_ref()
                        .map(|amount| {
                            amount
                                .to_minor_unit(request.currency)
                                .change_context(ConnectorError::AmountConversionFailed)
                                .and_then(|amount| data.convert_amount(amount, request.currency))
                        })
                        .transpose()?,
                    transaction_item_index_number: item.transaction_item_index_number,
                    tax_only: item.tax_only,
                })
            })
            .collect::<CustomResult<Vec<_>, ConnectorError>>()?;

        Ok(Self {
            auth: Authentication::try_from(&data.router_data.connector_auth_type)?,
            refunds: vec![VindiciaRefund {
                merchant_refund_id: request.refund_id.clone(),
                transaction,
                amount,
                currency: request.currency,
                note: request.note.clone(),
                refund_items,
                name_values: name_values(&request.attributes)?,
            }],
        })
    }
}

// Response types

#[derive(Clone, Debug, Default, PartialEq, Eq, strum::EnumString)]
pub enum VindiciaTransactionStatus {
    New,
    Authorizing,
    AuthorizationPending,
    AuthorizedPending,
    Authorized,
    AuthorizedForValidation,
    Captured,
    Settled,
    Cancelled,
    Refunded,
    #[default]
    #[strum(disabled)]
    Unknown,
}

impl VindiciaTransactionStatus {
    fn parse(status: Option<&str>) -> Self {
        status
            .and_then(|status| Self::from_str(status).ok())
            .unwrap_or_default()
    }
}

impl From<&VindiciaTransactionStatus> for AttemptStatus {
    fn from(status: &VindiciaTransactionStatus) -> Self {
        match status {
            VindiciaTransactionStatus::Authorized
            | VindiciaTransactionStatus::AuthorizedForValidation => Self::Authorized,
            VindiciaTransactionStatus::Captured
            | VindiciaTransactionStatus::Settled
            | VindiciaTransactionStatus::Refunded => Self::Charged,
            VindiciaTransactionStatus::Cancelled => Self::AuthorizationFailed,
            VindiciaTransactionStatus::New
            | VindiciaTransactionStatus::Authorizing
            | VindiciaTransactionStatus::AuthorizationPending
            | VindiciaTransactionStatus::AuthorizedPending
            | VindiciaTransactionStatus::Unknown => Self::Pending,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VindiciaTransactionResult {
    pub vid: Option<String>,
    pub merchant_transaction_id: Option<String>,
    /// Most recent entry of the status log.
    pub status: VindiciaTransactionStatus,
    pub auth_code: Option<String>,
}

impl From<&XmlElement> for VindiciaTransactionResult {
    fn from(transaction: &XmlElement) -> Self {
        let latest_status = transaction.child("statusLog");
        Self {
            vid: transaction.child_string("VID"),
            merchant_transaction_id: transaction.child_string("merchantTransactionId"),
            status: VindiciaTransactionStatus::parse(
                latest_status.and_then(|status| status.child_text("status")),
            ),
            auth_code: latest_status
                .and_then(|status| status.child("creditCardStatus"))
                .and_then(|status| status.child_string("authCode")),
        }
    }
}

/// Answer of `Transaction.auth` and `Transaction.authCapture`.
#[derive(Clone, Debug)]
pub struct VindiciaTransactionResponse {
    pub soap_return: VindiciaReturn,
    pub transaction: Option<VindiciaTransactionResult>,
    pub score: Option<i64>,
}

impl TryFrom<SoapResponse> for VindiciaTransactionResponse {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(response: SoapResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            transaction: response
                .body
                .child("transaction")
                .map(VindiciaTransactionResult::from),
            score: response.body.child_i64("score"),
            soap_return: response.soap_return,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VindiciaBatchResult {
    pub return_code: Option<String>,
    pub vid: Option<String>,
    pub merchant_transaction_id: Option<String>,
}

/// Answer of `Transaction.capture` and `Transaction.cancel`.
#[derive(Clone, Debug)]
pub struct VindiciaBatchResponse {
    pub soap_return: VindiciaReturn,
    pub qty_success: i64,
    pub qty_fail: i64,
    pub results: Vec<VindiciaBatchResult>,
}

impl VindiciaBatchResponse {
    fn succeeded(&self) -> bool {
        self.soap_return.is_success()
            && self.qty_success > 0
            && self.results.iter().all(|result| {
                result
                    .return_code
                    .as_deref()
                    .map_or(true, |code| code == VindiciaReturn::SUCCESS_CODE)
            })
    }
}

impl TryFrom<SoapResponse> for VindiciaBatchResponse {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(response: SoapResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            qty_success: response.body.child_i64("qtySuccess").unwrap_or_default(),
            qty_fail: response.body.child_i64("qtyFail").unwrap_or_default(),
            results: response
                .body
                .children_named("results")
                .map(|result| VindiciaBatchResult {
                    return_code: result.child_string("returnCode"),
                    vid: result.child_string("VID"),
                    merchant_transaction_id: result.child_string("merchantTransactionId"),
                })
                .collect(),
            soap_return: response.soap_return,
        })
    }
}

/// Answer of `AutoBill.update`.
#[derive(Clone, Debug)]
pub struct VindiciaAutoBillResponse {
    pub soap_return: VindiciaReturn,
    pub vid: Option<String>,
    pub merchant_auto_bill_id: Option<String>,
    pub status: Option<String>,
    pub created: Option<bool>,
    /// Status of the validation transaction, when one was run.
    pub auth_status: Option<VindiciaTransactionStatus>,
}

impl TryFrom<SoapResponse> for VindiciaAutoBillResponse {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(response: SoapResponse) -> Result<Self, Self::Error> {
        let autobill = response.body.child("autobill");
        Ok(Self {
            vid: autobill.and_then(|autobill| autobill.child_string("VID")),
            merchant_auto_bill_id: autobill
                .and_then(|autobill| autobill.child_string("merchantAutoBillId")),
            status: autobill.and_then(|autobill| autobill.child_string("status")),
            created: response.body.child_bool("created"),
            auth_status: response
                .body
                .child("authStatus")
                .map(|status| VindiciaTransactionStatus::parse(status.child_text("status"))),
            soap_return: response.soap_return,
        })
    }
}

/// Answer of `Account.updatePaymentMethod`.
#[derive(Clone, Debug)]
pub struct VindiciaPaymentMethodResponse {
    pub soap_return: VindiciaReturn,
    pub vid: Option<String>,
    pub merchant_payment_method_id: Option<String>,
    pub validated: Option<bool>,
    pub score: Option<i64>,
}

impl TryFrom<SoapResponse> for VindiciaPaymentMethodResponse {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(response: SoapResponse) -> Result<Self, Self::Error> {
        let payment_method = response.body.child("paymentMethod");
        Ok(Self {
            vid: payment_method.and_then(|method| method.child_string("VID")),
            merchant_payment_method_id: payment_method
                .and_then(|method| method.child_string("merchantPaymentMethodId")),
            validated: response.body.child_bool("validated"),
            score: response.body.child_i64("score"),
            soap_return: response.soap_return,
        })
    }
}

/// Answer of `Account.update`.
#[derive(Clone, Debug)]
pub struct VindiciaAccountResponse {
    pub soap_return: VindiciaReturn,
    pub vid: Option<String>,
    pub merchant_account_id: Option<String>,
    pub created: Option<bool>,
}

impl TryFrom<SoapResponse> for VindiciaAccountResponse {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(response: SoapResponse) -> Result<Self, Self::Error> {
        let account = response.body.child("account");
        Ok(Self {
            vid: account.and_then(|account| account.child_string("VID")),
            merchant_account_id: account
                .and_then(|account| account.child_string("merchantAccountId")),
            created: response.body.child_bool("created"),
            soap_return: response.soap_return,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, strum::EnumString)]
pub enum VindiciaRefundStatus {
    Pending,
    Processing,
    Complete,
    Failed,
    #[strum(disabled)]
    Unknown,
}

impl From<VindiciaRefundStatus> for RefundStatus {
    fn from(status: VindiciaRefundStatus) -> Self {
        match status {
            VindiciaRefundStatus::Complete => Self::Success,
            VindiciaRefundStatus::Failed => Self::Failure,
            VindiciaRefundStatus::Pending
            | VindiciaRefundStatus::Processing
            | VindiciaRefundStatus::Unknown => Self::Pending,
        }
    }
}

/// Answer of `Refund.perform`.
#[derive(Clone, Debug)]
pub struct VindiciaRefundResponse {
    pub soap_return: VindiciaReturn,
    pub vid: Option<String>,
    pub merchant_refund_id: Option<String>,
    pub status: VindiciaRefundStatus,
}

impl TryFrom<SoapResponse> for VindiciaRefundResponse {
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(response: SoapResponse) -> Result<Self, Self::Error> {
        let refund = response.body.child("refunds");
        Ok(Self {
            vid: refund.and_then(|refund| refund.child_string("VID")),
            merchant_refund_id: refund.and_then(|refund| refund.child_string("merchantRefundId")),
            status: refund
                .and_then(|refund| refund.child_text("status"))
                .and_then(|status| VindiciaRefundStatus::from_str(status).ok())
                .unwrap_or(VindiciaRefundStatus::Unknown),
            soap_return: response.soap_return,
        })
    }
}

// Response mapping

fn return_error(
    soap_return: &VindiciaReturn,
    http_code: u16,
    attempt_status: Option<AttemptStatus>,
    connector_transaction_id: Option<String>,
) -> ErrorResponse {
    ErrorResponse {
        code: soap_return.return_code.clone(),
        message: soap_return
            .return_string
            .clone()
            .unwrap_or_else(|| NO_ERROR_MESSAGE.to_string()),
        reason: soap_return.return_string.clone(),
        status_code: http_code,
        attempt_status,
        connector_transaction_id,
        raw_connector_response: None,
    }
}

impl<F, Req> TryFrom<ResponseRouterData<VindiciaTransactionResponse, Self>>
    for RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        value: ResponseRouterData<VindiciaTransactionResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = value;

        let transaction_vid = response
            .transaction
            .as_ref()
            .and_then(|transaction| transaction.vid.clone());

        let (status, response_data) = match (&response.transaction, response.soap_return.is_success()) {
            (_, false) => (
                AttemptStatus::Failure,
                Err(return_error(
                    &response.soap_return,
                    http_code,
                    Some(AttemptStatus::Failure),
                    transaction_vid,
                )),
            ),
            (None, true) => Err(report!(ConnectorError::ResponseHandlingFailed)
                .attach_printable("successful answer without a transaction"))?,
            (Some(transaction), true) => {
                let status = AttemptStatus::from(&transaction.status);
                let response_data = if status == AttemptStatus::AuthorizationFailed {
                    Err(ErrorResponse {
                        code: transaction
                            .auth_code
                            .clone()
                            .unwrap_or_else(|| "Cancelled".to_string()),
                        message: "Transaction was declined".to_string(),
                        reason: response.soap_return.return_string.clone(),
                        status_code: http_code,
                        attempt_status: Some(status),
                        connector_transaction_id: transaction_vid,
                        raw_connector_response: None,
                    })
                } else {
                    Ok(PaymentsResponseData::TransactionResponse {
                        resource_id: transaction_vid
                            .map(ResponseId::ConnectorTransactionId)
                            .unwrap_or(ResponseId::NoResponseId),
                        merchant_transaction_id: transaction.merchant_transaction_id.clone(),
                        risk_score: response.score,
                    })
                };
                (status, response_data)
            }
        };

        Ok(Self {
            resource_common_data: PaymentFlowData {
                status,
                soap_id: response.soap_return.soap_id.clone(),
                ..router_data.resource_common_data
            },
            response: response_data,
            ..router_data
        })
    }
}

struct BatchOutcome {
    success: AttemptStatus,
    failure: AttemptStatus,
}

const CAPTURE_OUTCOME: BatchOutcome = BatchOutcome {
    success: AttemptStatus::Charged,
    failure: AttemptStatus::CaptureFailed,
};

const VOID_OUTCOME: BatchOutcome = BatchOutcome {
    success: AttemptStatus::Voided,
    failure: AttemptStatus::VoidFailed,
};

fn map_batch_response<F, Req>(
    value: ResponseRouterData<
        VindiciaBatchResponse,
        RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData>,
    >,
    outcome: &BatchOutcome,
) -> RouterDataV2<F, PaymentFlowData, Req, PaymentsResponseData> {
    let ResponseRouterData {
        response,
        router_data,
        http_code,
    } = value;

    let result = response.results.first();
    let vid = result.and_then(|result| result.vid.clone());

    let (status, response_data) = if response.succeeded() {
        (
            outcome.success,
            Ok(PaymentsResponseData::TransactionResponse {
                resource_id: vid
                    .map(ResponseId::ConnectorTransactionId)
                    .unwrap_or(ResponseId::NoResponseId),
                merchant_transaction_id: result
                    .and_then(|result| result.merchant_transaction_id.clone()),
                risk_score: None,
            }),
        )
    } else {
        let failed_return = match result.and_then(|result| result.return_code.clone()) {
            Some(return_code) if response.soap_return.is_success() => VindiciaReturn {
                return_code,
                ..response.soap_return.clone()
            },
            _ => response.soap_return.clone(),
        };
        (
            outcome.failure,
            Err(return_error(
                &failed_return,
                http_code,
                Some(outcome.failure),
                vid,
            )),
        )
    };

    RouterDataV2 {
        resource_common_data: PaymentFlowData {
            status,
            soap_id: response.soap_return.soap_id.clone(),
            ..router_data.resource_common_data
        },
        response: response_data,
        ..router_data
    }
}

impl<F> TryFrom<ResponseRouterData<VindiciaBatchResponse, Self>>
    for RouterDataV2<F, PaymentFlowData, PaymentsCaptureData, PaymentsResponseData>
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(value: ResponseRouterData<VindiciaBatchResponse, Self>) -> Result<Self, Self::Error> {
        Ok(map_batch_response(value, &CAPTURE_OUTCOME))
    }
}

impl<F> TryFrom<ResponseRouterData<VindiciaBatchResponse, Self>>
    for RouterDataV2<F, PaymentFlowData, PaymentVoidData, PaymentsResponseData>
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(value: ResponseRouterData<VindiciaBatchResponse, Self>) -> Result<Self, Self::Error> {
        Ok(map_batch_response(value, &VOID_OUTCOME))
    }
}

impl<F> TryFrom<ResponseRouterData<VindiciaAutoBillResponse, Self>>
    for RouterDataV2<F, PaymentFlowData, SubscriptionData, PaymentsResponseData>
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        value: ResponseRouterData<VindiciaAutoBillResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = value;

        let declined = response.auth_status.as_ref().map(AttemptStatus::from)
            == Some(AttemptStatus::AuthorizationFailed);

        let (status, response_data) = if !response.soap_return.is_success() || declined {
            let status = if declined {
                AttemptStatus::AuthorizationFailed
            } else {
                AttemptStatus::Failure
            };
            (
                status,
                Err(return_error(
                    &response.soap_return,
                    http_code,
                    Some(status),
                    None,
                )),
            )
        } else {
            (
                AttemptStatus::Authorized,
                Ok(PaymentsResponseData::SubscriptionResponse {
                    subscription_reference: response.vid.clone(),
                    subscription_id: response.merchant_auto_bill_id.clone(),
                    subscription_status: response.status.clone(),
                    created: response.created,
                }),
            )
        };

        Ok(Self {
            resource_common_data: PaymentFlowData {
                status,
                soap_id: response.soap_return.soap_id.clone(),
                ..router_data.resource_common_data
            },
            response: response_data,
            ..router_data
        })
    }
}

impl<F> TryFrom<ResponseRouterData<VindiciaPaymentMethodResponse, Self>>
    for RouterDataV2<F, PaymentFlowData, PaymentMethodRequestData, PaymentsResponseData>
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        value: ResponseRouterData<VindiciaPaymentMethodResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = value;

        let (status, response_data) = if response.soap_return.is_success() {
            (
                if response.validated == Some(true) {
                    AttemptStatus::Authorized
                } else {
                    AttemptStatus::Pending
                },
                Ok(PaymentsResponseData::PaymentMethodResponse {
                    payment_method_reference: response.vid.clone(),
                    payment_method_id: response.merchant_payment_method_id.clone(),
                    validated: response.validated,
                    risk_score: response.score,
                }),
            )
        } else {
            (
                AttemptStatus::Failure,
                Err(return_error(
                    &response.soap_return,
                    http_code,
                    Some(AttemptStatus::Failure),
                    None,
                )),
            )
        };

        Ok(Self {
            resource_common_data: PaymentFlowData {
                status,
                soap_id: response.soap_return.soap_id.clone(),
                ..router_data.resource_common_data
            },
            response: response_data,
            ..router_data
        })
    }
}

impl<F> TryFrom<ResponseRouterData<VindiciaAccountResponse, Self>>
    for RouterDataV2<F, PaymentFlowData, CustomerData, PaymentsResponseData>
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        value: ResponseRouterData<VindiciaAccountResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = value;

        let (status, response_data) = if response.soap_return.is_success() {
            (
                router_data.resource_common_data.status,
                Ok(PaymentsResponseData::CustomerResponse {
                    customer_reference: response.vid.clone(),
                    customer_id: response.merchant_account_id.clone(),
                    created: response.created,
                }),
            )
        } else {
            (
                AttemptStatus::Failure,
                Err(return_error(
                    &response.soap_return,
                    http_code,
                    Some(AttemptStatus::Failure),
                    None,
                )),
            )
        };

        Ok(Self {
            resource_common_data: PaymentFlowData {
                status,
                soap_id: response.soap_return.soap_id.clone(),
                ..router_data.resource_common_data
            },
            response: response_data,
            ..router_data
        })
    }
}

impl<F> TryFrom<ResponseRouterData<VindiciaRefundResponse, Self>>
    for RouterDataV2<F, RefundFlowData, RefundsData, RefundsResponseData>
{
    type Error = error_stack::Report<ConnectorError>;
    fn try_from(
        value: ResponseRouterData<VindiciaRefundResponse, Self>,
    ) -> Result<Self, Self::Error> {
        let ResponseRouterData {
            response,
            router_data,
            http_code,
        } = value;

        let (status, response_data) = if response.soap_return.is_success() {
            let refund_status = RefundStatus::from(response.status.clone());
            (
                refund_status,
                Ok(RefundsResponseData {
                    connector_refund_id: response.vid.clone(),
                    refund_id: response.merchant_refund_id.clone(),
                    refund_status,
                }),
            )
        } else {
            (
                RefundStatus::Failure,
                Err(return_error(&response.soap_return, http_code, None, None)),
            )
        };

        Ok(Self {
            resource_common_data: RefundFlowData {
                status,
                soap_id: response.soap_return.soap_id.clone(),
                ..router_data.resource_common_data
            },
            response: response_data,
            ..router_data
        })
    }
}
