//! Line items of a refund.
//!
//! A [`RefundItemBag`] keeps its items in insertion order; the order is the order in which
//! the items are sent to the connector.

use common_enums::Currency;
use common_utils::{errors::ParsingError, CustomResult, MinorUnit};
use error_stack::report;
use serde_json::{Map, Value};

/// Amount of a refund item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefundItemAmount {
    /// Minor units of the refund currency.
    Minor(MinorUnit),
    /// Decimal text in major units, such as `"3.50"`.
    Major(String),
}

impl RefundItemAmount {
    pub fn to_minor_unit(&self, currency: Currency) -> CustomResult<MinorUnit, ParsingError> {
        match self {
            Self::Minor(amount) => Ok(*amount),
            Self::Major(amount) => MinorUnit::from_major_unit_str(amount, currency),
        }
    }
}

impl From<MinorUnit> for RefundItemAmount {
    fn from(amount: MinorUnit) -> Self {
        Self::Minor(amount)
    }
}

/// One refunded entry of a previously captured transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefundItem {
    pub sku: Option<String>,
    /// Amount to refund for this item.
    pub amount: Option<RefundItemAmount>,
    /// Position of the item inside the original transaction.
    pub transaction_item_index_number: Option<u64>,
    /// Refund only the tax charged for the item.
    pub tax_only: Option<bool>,
}

impl RefundItem {
    /// Builds an item from raw fields.
    ///
    /// Keys are accepted in camelCase or snake_case. Unknown keys and values of an unusable
    /// type are ignored. Integral amounts are minor units; amounts with a fractional part
    /// are major units.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            sku: lookup(fields, &["sku"]).and_then(value_as_text),
            amount: lookup(fields, &["amount"]).and_then(value_as_amount),
            transaction_item_index_number: lookup(
                fields,
                &["transactionItemIndexNumber", "transaction_item_index_number"],
            )
            .and_then(value_as_integer)
            .and_then(|index| u64::try_from(index).ok()),
            tax_only: lookup(fields, &["taxOnly", "tax_only"]).and_then(Value::as_bool),
        }
    }
}

fn lookup<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| fields.get(*key))
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_amount(value: &Value) -> Option<RefundItemAmount> {
    let major = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return None,
    };
    Some(value_as_integer(value).map_or(RefundItemAmount::Major(major), |amount| {
        RefundItemAmount::Minor(MinorUnit::new(amount))
    }))
}

/// What [`RefundItemBag::add`] accepts: a ready item or the raw fields to build one from.
#[derive(Clone, Debug)]
pub enum RefundItemSource {
    Item(RefundItem),
    Fields(Map<String, Value>),
}

impl From<RefundItem> for RefundItemSource {
    fn from(item: RefundItem) -> Self {
        Self::Item(item)
    }
}

impl From<Map<String, Value>> for RefundItemSource {
    fn from(fields: Map<String, Value>) -> Self {
        Self::Fields(fields)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefundItemBag {
    items: Vec<RefundItem>,
}

impl RefundItemBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item, building it first when raw fields are given.
    pub fn add(&mut self, item: impl Into<RefundItemSource>) {
        let item = match item.into() {
            RefundItemSource::Item(item) => item,
            RefundItemSource::Fields(fields) => RefundItem::from_fields(&fields),
        };
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RefundItem> {
        self.items.iter()
    }

    /// Sum of the item amounts in minor units of `currency`.
    ///
    /// `None` when the bag is empty or any item leaves its amount open.
    pub fn total_amount(
        &self,
        currency: Currency,
    ) -> CustomResult<Option<MinorUnit>, ParsingError> {
        if self.items.is_empty() {
            return Ok(None);
        }
        self.items
            .iter()
            .try_fold(Some(MinorUnit::zero()), |total, item| {
                let (Some(total), Some(amount)) = (total, item.amount.as_ref()) else {
                    return Ok(None);
                };
                let amount = amount.to_minor_unit(currency)?;
                total
                    .checked_add(amount)
                    .map(Some)
                    .ok_or_else(|| report!(ParsingError::AmountOverflow))
            })
    }
}

impl<'a> IntoIterator for &'a RefundItemBag {
    type Item = &'a RefundItem;
    type IntoIter = std::slice::Iter<'a, RefundItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<S: Into<RefundItemSource>> FromIterator<S> for RefundItemBag {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut bag = Self::new();
        iter.into_iter().for_each(|item| bag.add(item));
        bag
    }
}
