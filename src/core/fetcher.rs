//! Typed fetches on top of a [`Transport`]

use super::endpoint::Endpoint;
use super::error::FetchError;
use super::model::{Currencies, ExchangeRates, ListData, ListSource, currency_entries};
use super::transport::Transport;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends `endpoint` and decodes the body as JSON into `T`.
    #[instrument(name = "Fetch", skip(self, endpoint), fields(endpoint = %endpoint))]
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, FetchError> {
        let body = self.transport.send(endpoint).await?;
        serde_json::from_slice(&body).map_err(|e| {
            debug!(
                error = %e,
                body = %String::from_utf8_lossy(&body),
                "Failed to decode response"
            );
            FetchError::from(e)
        })
    }

    pub async fn latest_rates(&self) -> Result<ExchangeRates, FetchError> {
        self.fetch(&Endpoint::Latest).await
    }

    pub async fn currencies(&self) -> Result<Currencies, FetchError> {
        self.fetch(&Endpoint::Currencies).await
    }

    /// Converts via the API and returns the amount quoted for `to`.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, FetchError> {
        let rates: ExchangeRates = self.fetch(&Endpoint::convert(amount, from, to)).await?;
        rates
            .rate_for(to)
            .ok_or_else(|| FetchError::Decode(format!("No rate found for currency: {to}")))
    }

    /// Fetches the rows backing a list of the given kind.
    pub async fn list_data(&self, source: ListSource) -> Result<ListData, FetchError> {
        let endpoint = source.endpoint();
        match source {
            ListSource::Rates => {
                let rates: ExchangeRates = self.fetch(&endpoint).await?;
                Ok(rates.into_list_data())
            }
            ListSource::Currencies => Ok(ListData {
                entries: currency_entries(self.fetch(&endpoint).await?),
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::error::TransportError;
    use crate::core::model::{Entry, RatesCaption};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned bodies keyed by endpoint path.
    pub(crate) struct StubTransport {
        responses: Mutex<HashMap<&'static str, Result<Vec<u8>, TransportError>>>,
        pub(crate) calls: AtomicUsize,
    }

    impl StubTransport {
        pub(crate) fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn respond(&self, path: &'static str, body: &str) {
            self.responses
                .lock()
                .unwrap()
                .insert(path, Ok(body.as_bytes().to_vec()));
        }

        pub(crate) fn fail(&self, path: &'static str, err: TransportError) {
            self.responses.lock().unwrap().insert(path, Err(err));
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, endpoint: &Endpoint) -> Result<Vec<u8>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .get(endpoint.path())
                .cloned()
                .unwrap_or(Err(TransportError::StatusCode(404)))
        }
    }

    fn fetcher_with(stub: Arc<StubTransport>) -> Fetcher {
        Fetcher::new(stub)
    }

    #[tokio::test]
    async fn test_fetch_latest_rates() {
        let stub = Arc::new(StubTransport::new());
        stub.respond("latest", r#"{"base": "EUR", "rates": {"USD": 1.1, "GBP": 0.85}}"#);
        let fetcher = fetcher_with(stub.clone());

        let rates = fetcher.latest_rates().await.unwrap();
        assert_eq!(rates.rate_for("USD"), Some(1.1));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_decode_failure_is_distinct_from_transport_failure() {
        let stub = Arc::new(StubTransport::new());
        stub.respond("latest", r#"{"rates": "#);
        stub.fail("currencies", TransportError::StatusCode(500));
        let fetcher = fetcher_with(stub);

        let decode = fetcher.latest_rates().await.unwrap_err();
        assert!(decode.is_decode());

        let transport = fetcher.currencies().await.unwrap_err();
        assert_eq!(
            transport,
            FetchError::Transport(TransportError::StatusCode(500))
        );
    }

    #[tokio::test]
    async fn test_convert_returns_target_rate() {
        let stub = Arc::new(StubTransport::new());
        stub.respond("latest", r#"{"amount": 10.0, "base": "USD", "rates": {"EUR": 9.5}}"#);
        let fetcher = fetcher_with(stub);

        assert_eq!(fetcher.convert(10.0, "USD", "EUR").await.unwrap(), 9.5);

        let missing = fetcher.convert(10.0, "USD", "JPY").await.unwrap_err();
        assert_eq!(
            missing,
            FetchError::Decode("No rate found for currency: JPY".to_string())
        );
    }

    #[tokio::test]
    async fn test_list_data_by_source() {
        let stub = Arc::new(StubTransport::new());
        stub.respond("latest", r#"{"base": "EUR", "rates": {"USD": 1.1}}"#);
        stub.respond("currencies", r#"{"USD": "United States Dollar"}"#);
        let fetcher = fetcher_with(stub);

        let rates = fetcher.list_data(ListSource::Rates).await.unwrap();
        assert_eq!(rates.entries, vec![Entry::number("USD", 1.1)]);
        assert_eq!(rates.caption.base.as_deref(), Some("EUR"));

        let currencies = fetcher.list_data(ListSource::Currencies).await.unwrap();
        assert_eq!(
            currencies.entries,
            vec![Entry::label("USD", "United States Dollar")]
        );
        assert_eq!(currencies.caption, RatesCaption::default());
    }
}
