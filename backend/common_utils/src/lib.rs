pub mod consts;
pub mod errors;
pub mod fp_utils;
pub mod request;
pub mod types;

pub use errors::CustomResult;
pub use request::{Method, Request, RequestBuilder, RequestContent};
pub use types::{AmountConvertor, MinorUnit, StringMajorUnit, StringMajorUnitForConnector};
