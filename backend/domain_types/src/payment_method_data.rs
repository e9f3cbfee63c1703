use hyperswitch_masking::{PeekInterface, Secret};

/// Card details as supplied by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Card {
    pub number: Secret<String>,
    pub expiry_month: Secret<String>,
    /// Two or four digit year.
    pub expiry_year: Secret<String>,
    pub cvv: Option<Secret<String>>,
    pub holder_name: Option<Secret<String>>,
    pub postcode: Option<Secret<String>>,
    /// ISO 3166 alpha-2 country of the billing address.
    pub country: Option<String>,
}

impl Card {
    /// Expiry in the `YYYYMM` form.
    pub fn get_expiry_date_as_yyyymm(&self) -> Secret<String> {
        let year = self.expiry_year.peek().trim();
        let year = if year.len() == 2 {
            format!("20{year}")
        } else {
            year.to_string()
        };
        let month = self.expiry_month.peek().trim();
        Secret::new(format!("{year}{month:0>2}"))
    }
}
