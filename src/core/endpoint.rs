//! Named API endpoints and their URL composition

use super::error::TransportError;
use reqwest::Url;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// Latest rates against the API's base currency.
    Latest,
    /// Currency codes with their display names.
    Currencies,
    /// Convert `amount` of `from` into `to`.
    Convert { amount: f64, from: String, to: String },
}

impl Endpoint {
    pub fn convert(amount: f64, from: impl Into<String>, to: impl Into<String>) -> Self {
        Endpoint::Convert {
            amount,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Latest | Endpoint::Convert { .. } => "latest",
            Endpoint::Currencies => "currencies",
        }
    }

    /// Resolves the endpoint against `base_url`.
    ///
    /// The endpoint path is appended as a segment of the base path, so a base
    /// carrying a query or fragment is rejected. Currency codes must be
    /// non-empty and alphanumeric, otherwise the endpoint is rejected before
    /// any request is made.
    pub fn url(&self, base_url: &str) -> Result<Url, TransportError> {
        let mut url = Url::parse(base_url)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{base_url}: {e}")))?;
        if url.query().is_some() || url.fragment().is_some() {
            return Err(TransportError::InvalidEndpoint(format!(
                "{base_url}: base URL must not carry a query or fragment"
            )));
        }
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidEndpoint(format!("{base_url}: not a base URL")))?
            .pop_if_empty()
            .push(self.path());

        if let Endpoint::Convert { amount, from, to } = self {
            for code in [from, to] {
                if !is_valid_code(code) {
                    return Err(TransportError::InvalidEndpoint(format!(
                        "invalid currency code: {code:?}"
                    )));
                }
            }
            if !amount.is_finite() {
                return Err(TransportError::InvalidEndpoint(format!(
                    "invalid amount: {amount}"
                )));
            }
            url.query_pairs_mut()
                .append_pair("amount", &amount.to_string())
                .append_pair("from", from)
                .append_pair("to", to);
        }

        Ok(url)
    }
}

fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Latest => write!(f, "latest"),
            Endpoint::Currencies => write!(f, "currencies"),
            Endpoint::Convert { amount, from, to } => write!(f, "convert {amount} {from}->{to}"),
        }
    }
}
