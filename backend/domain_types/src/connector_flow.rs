#[derive(Debug, Clone)]
pub struct Authorize;

#[derive(Debug, Clone)]
pub struct Purchase;

#[derive(Debug, Clone)]
pub struct Capture;

#[derive(Debug, Clone)]
pub struct Void;

#[derive(Debug, Clone)]
pub struct Refund;

#[derive(Debug, Clone)]
pub struct CreateSubscription;

#[derive(Debug, Clone)]
pub struct CreatePaymentMethod;

#[derive(Debug, Clone)]
pub struct CreateCustomer;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowName {
    Authorize,
    Purchase,
    Capture,
    Void,
    Refund,
    CreateSubscription,
    CreatePaymentMethod,
    CreateCustomer,
}
