//! Conversion between two selected currencies.
//!
//! Every change to the source code, target code or amount bumps a revision
//! and, once all three are usable, spawns a conversion fetch. Responses come
//! back over a channel and are applied on the task that owns the controller,
//! either in arrival order or only when they answer the latest revision.
//! Fetches run on the runtime the controller was created for, so the setters
//! themselves can be called from synchronous code.

use crate::core::{Endpoint, FetchError, Fetcher};
use serde::{Deserialize, Serialize};
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

pub const PLACEHOLDER: &str = "Select the Currency";

/// How overlapping conversion responses are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Only a response to the most recent inputs updates the result.
    #[default]
    LatestRequest,
    /// Whichever response arrives last wins.
    ArrivalOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub revision: u64,
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConversionRequest {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::convert(self.amount, &self.from, &self.to)
    }
}

#[derive(Debug)]
pub struct ConversionResponse {
    pub request: ConversionRequest,
    pub outcome: Result<f64, FetchError>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionSnapshot {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: f64,
    pub result: Option<f64>,
    pub stale: bool,
    pub in_flight: usize,
    pub last_error: Option<FetchError>,
}

/// Handed to whoever picks a currency; completing it answers the controller.
#[derive(Debug)]
pub struct CurrencyPick {
    side: Side,
    reply: oneshot::Sender<String>,
}

impl CurrencyPick {
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns false if the controller stopped waiting.
    pub fn choose(self, code: impl Into<String>) -> bool {
        self.reply.send(code.into()).is_ok()
    }
}

#[derive(Debug)]
pub struct PendingPick {
    side: Side,
    reply: oneshot::Receiver<String>,
}

pub struct ConversionController {
    fetcher: Fetcher,
    runtime: Handle,
    ordering: ResponseOrdering,
    from: Option<String>,
    to: Option<String>,
    amount: f64,
    result: Option<f64>,
    result_revision: Option<u64>,
    revision: u64,
    in_flight: usize,
    last_error: Option<FetchError>,
    tx: mpsc::UnboundedSender<ConversionResponse>,
    rx: mpsc::UnboundedReceiver<ConversionResponse>,
    notify: watch::Sender<ConversionSnapshot>,
}

impl ConversionController {
    /// Creates a controller that spawns its fetches on the current tokio
    /// runtime. Fails when called outside of one.
    pub fn new(fetcher: Fetcher, ordering: ResponseOrdering) -> Result<Self, TryCurrentError> {
        Ok(Self::with_runtime(fetcher, ordering, Handle::try_current()?))
    }

    /// Creates a controller that spawns its fetches on `runtime`.
    pub fn with_runtime(fetcher: Fetcher, ordering: ResponseOrdering, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (notify, _) = watch::channel(ConversionSnapshot::default());
        Self {
            fetcher,
            runtime,
            ordering,
            from: None,
            to: None,
            amount: 0.0,
            result: None,
            result_revision: None,
            revision: 0,
            in_flight: 0,
            last_error: None,
            tx,
            rx,
            notify,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversionSnapshot> {
        self.notify.subscribe()
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Latest accepted result, possibly for inputs that have since changed.
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    /// True when a result exists but the inputs changed after it was requested.
    pub fn is_stale(&self) -> bool {
        self.result.is_some() && self.result_revision != Some(self.revision)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn select_from(&mut self, code: impl Into<String>) -> Option<ConversionRequest> {
        self.from = Some(code.into());
        self.changed()
    }

    pub fn select_to(&mut self, code: impl Into<String>) -> Option<ConversionRequest> {
        self.to = Some(code.into());
        self.changed()
    }

    pub fn select(&mut self, side: Side, code: impl Into<String>) -> Option<ConversionRequest> {
        match side {
            Side::From => self.select_from(code),
            Side::To => self.select_to(code),
        }
    }

    /// Negative or non-finite amounts become zero.
    pub fn set_amount(&mut self, value: f64) -> Option<ConversionRequest> {
        self.amount = if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        };
        self.changed()
    }

    /// Parses user input; anything that isn't a number becomes zero.
    pub fn set_amount_text(&mut self, text: &str) -> Option<ConversionRequest> {
        self.set_amount(text.trim().parse().unwrap_or(0.0))
    }

    /// Starts a request/response exchange with a currency picker.
    pub fn begin_pick(&self, side: Side) -> (CurrencyPick, PendingPick) {
        let (tx, rx) = oneshot::channel();
        (
            CurrencyPick { side, reply: tx },
            PendingPick { side, reply: rx },
        )
    }

    /// Waits for the picker and applies its choice. Returns false when the
    /// picker was dropped without choosing.
    pub async fn finish_pick(&mut self, pending: PendingPick) -> bool {
        match pending.reply.await {
            Ok(code) => {
                self.select(pending.side, code);
                true
            }
            Err(_) => {
                debug!(side = ?pending.side, "Currency pick cancelled");
                false
            }
        }
    }

    /// Label for a selection row.
    pub fn title_for(&self, side: Side) -> &str {
        let code = match side {
            Side::From => self.from.as_deref(),
            Side::To => self.to.as_deref(),
        };
        code.unwrap_or(PLACEHOLDER)
    }

    pub fn result_text(&self) -> String {
        self.result.map(|r| r.to_string()).unwrap_or_default()
    }

    /// Applies one response. Returns whether it updated the state.
    pub fn apply_response(&mut self, response: ConversionResponse) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        let ConversionResponse { request, outcome } = response;

        if self.ordering == ResponseOrdering::LatestRequest && request.revision != self.revision {
            debug!(
                revision = request.revision,
                current = self.revision,
                "Discarding superseded conversion response"
            );
            self.publish();
            return false;
        }

        match outcome {
            Ok(value) => {
                self.result = Some(value);
                self.result_revision = Some(request.revision);
                self.last_error = None;
            }
            Err(err) => {
                warn!(
                    error = %err,
                    from = %request.from,
                    to = %request.to,
                    "Conversion failed, keeping previous result"
                );
                self.last_error = Some(err);
            }
        }
        self.publish();
        true
    }

    /// Waits for the next response and applies it. Returns `None` when
    /// nothing is in flight.
    pub async fn next_response(&mut self) -> Option<bool> {
        if self.in_flight == 0 {
            return None;
        }
        let response = self.rx.recv().await?;
        Some(self.apply_response(response))
    }

    /// Applies every response that has already arrived.
    pub fn apply_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(response) = self.rx.try_recv() {
            self.apply_response(response);
            applied += 1;
        }
        applied
    }

    /// Waits until no request is in flight.
    pub async fn settle(&mut self) {
        while self.next_response().await.is_some() {}
    }

    fn changed(&mut self) -> Option<ConversionRequest> {
        self.revision += 1;
        let request = self.pending_request();
        if let Some(request) = &request {
            self.dispatch(request.clone());
        }
        self.publish();
        request
    }

    fn pending_request(&self) -> Option<ConversionRequest> {
        let (from, to) = (self.from.as_ref()?, self.to.as_ref()?);
        if self.amount <= 0.0 {
            return None;
        }
        Some(ConversionRequest {
            revision: self.revision,
            amount: self.amount,
            from: from.clone(),
            to: to.clone(),
        })
    }

    fn dispatch(&mut self, request: ConversionRequest) {
        debug!(endpoint = %request.endpoint(), revision = request.revision, "Dispatching conversion");
        self.in_flight += 1;
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = fetcher
                .convert(request.amount, &request.from, &request.to)
                .await;
            if tx.send(ConversionResponse { request, outcome }).is_err() {
                debug!("Conversion controller dropped before response arrived");
            }
        });
    }

    fn snapshot(&self) -> ConversionSnapshot {
        ConversionSnapshot {
            from: self.from.clone(),
            to: self.to.clone(),
            amount: self.amount,
            result: self.result,
            stale: self.is_stale(),
            in_flight: self.in_flight,
            last_error: self.last_error.clone(),
        }
    }

    fn publish(&self) {
        self.notify.send_replace(self.snapshot());
    }
}
