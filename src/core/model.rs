//! Exchange data as decoded from the API and as held by the list store

use super::endpoint::Endpoint;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

/// A rate set relative to one base currency.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeRates {
    pub amount: Option<f64>,
    pub base: Option<String>,
    pub date: Option<NaiveDate>,
    pub rates: HashMap<String, f64>,
}

impl ExchangeRates {
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn into_list_data(self) -> ListData {
        let entries = self
            .rates
            .into_iter()
            .map(|(code, rate)| Entry::number(code, rate))
            .collect();
        ListData {
            entries,
            caption: RatesCaption {
                base: self.base,
                date: self.date,
            },
        }
    }
}

/// Base currency and date of a rate set, when the API reports them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RatesCaption {
    pub base: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Rows fetched for a list, along with the caption of their source.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListData {
    pub entries: Vec<Entry>,
    pub caption: RatesCaption,
}

/// Currency code to display name.
pub type Currencies = BTreeMap<String, String>;

pub fn currency_entries(currencies: Currencies) -> Vec<Entry> {
    currencies
        .into_iter()
        .map(|(code, name)| Entry::label(code, name))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    Number(f64),
    Label(String),
}

impl Display for EntryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryValue::Number(n) => write!(f, "{n}"),
            EntryValue::Label(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub code: String,
    pub value: EntryValue,
}

impl Entry {
    pub fn number(code: impl Into<String>, value: f64) -> Self {
        Entry {
            code: code.into(),
            value: EntryValue::Number(value),
        }
    }

    pub fn label(code: impl Into<String>, value: impl Into<String>) -> Self {
        Entry {
            code: code.into(),
            value: EntryValue::Label(value.into()),
        }
    }
}

/// What a list store is populated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    /// Latest rates; rows carry numbers and are read-only.
    Rates,
    /// Currency names; rows carry labels and can be picked.
    Currencies,
}

impl ListSource {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ListSource::Rates => Endpoint::Latest,
            ListSource::Currencies => Endpoint::Currencies,
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, ListSource::Currencies)
    }
}
