//! Sorted, filterable, paginated list of entries.
//!
//! The store owns the full dataset fetched for one [`ListSource`] and serves
//! it one page at a time. The visible rows are always a prefix of the
//! filtered set, so pagination never reorders or skips entries. Every
//! mutation publishes a [`ListSnapshot`] to subscribers.

use crate::core::{Entry, FetchError, Fetcher, ListSource, RatesCaption};
use tokio::sync::watch;
use tracing::{debug, warn};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Immutable view of the store handed to subscribers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListSnapshot {
    pub displayed: Vec<Entry>,
    pub has_more: bool,
    pub filter_query: String,
    pub caption: RatesCaption,
    pub loading: bool,
    pub last_error: Option<FetchError>,
}

pub struct ListStore {
    source: ListSource,
    page_size: usize,
    all_entries: Vec<Entry>,
    filtered: Vec<Entry>,
    displayed_len: usize,
    filter_query: String,
    current_page: usize,
    has_more: bool,
    caption: RatesCaption,
    loading: bool,
    last_error: Option<FetchError>,
    notify: watch::Sender<ListSnapshot>,
}

impl ListStore {
    /// Creates an empty store. A zero `page_size` is treated as one.
    pub fn new(source: ListSource, page_size: usize) -> Self {
        let (notify, _) = watch::channel(ListSnapshot::default());
        Self {
            source,
            page_size: page_size.max(1),
            all_entries: Vec::new(),
            filtered: Vec::new(),
            displayed_len: 0,
            filter_query: String::new(),
            current_page: 0,
            has_more: false,
            caption: RatesCaption::default(),
            loading: false,
            last_error: None,
            notify,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.notify.subscribe()
    }

    pub fn source(&self) -> ListSource {
        self.source
    }

    pub fn is_selectable(&self) -> bool {
        self.source.is_selectable()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn all_entries(&self) -> &[Entry] {
        &self.all_entries
    }

    pub fn displayed(&self) -> &[Entry] {
        &self.filtered[..self.displayed_len]
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Base and date of the last successful fetch, if it reported any.
    pub fn caption(&self) -> &RatesCaption {
        &self.caption
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Replaces the dataset, keeping the current filter and rewinding to the
    /// first page. Duplicate codes keep their first occurrence.
    pub fn load(&mut self, mut entries: Vec<Entry>) {
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries.dedup_by(|a, b| a.code == b.code);
        debug!(count = entries.len(), source = ?self.source, "Loaded entries");
        self.all_entries = entries;
        self.apply_filter();
    }

    /// Filters by case-insensitive substring match on the code and rewinds
    /// to the first page.
    pub fn set_filter(&mut self, query: &str) {
        self.filter_query = query.to_string();
        self.apply_filter();
    }

    /// Appends the next page. Returns whether anything was appended.
    pub fn load_more(&mut self) -> bool {
        if self.loading || !self.has_more {
            return false;
        }

        if self.displayed_len >= self.filtered.len() {
            self.has_more = false;
            self.publish();
            return false;
        }

        self.current_page += 1;
        self.displayed_len = self.page_end();
        self.has_more = self.filtered.len() > self.displayed_len;
        debug!(
            page = self.current_page,
            displayed = self.displayed_len,
            "Loaded next page"
        );
        self.publish();
        true
    }

    pub fn entry_at(&self, index: usize) -> Option<&Entry> {
        self.displayed().get(index)
    }

    /// Code of the row at `index`, or an empty string.
    pub fn title_for(&self, index: usize) -> String {
        self.entry_at(index)
            .map(|e| e.code.clone())
            .unwrap_or_default()
    }

    /// Formatted value of the row at `index`, or an empty string.
    pub fn detail_for(&self, index: usize) -> String {
        self.entry_at(index)
            .map(|e| e.value.to_string())
            .unwrap_or_default()
    }

    /// Code of the row at `index` when the list is used as a picker.
    pub fn code_at(&self, index: usize) -> Option<&str> {
        if !self.is_selectable() {
            return None;
        }
        self.entry_at(index).map(|e| e.code.as_str())
    }

    /// Marks a fetch as in flight and returns what to fetch.
    pub fn begin_fetch(&mut self) -> ListSource {
        self.loading = true;
        self.publish();
        self.source
    }

    /// Applies a completed fetch. On failure the previous entries are kept
    /// and the error is recorded and returned.
    pub fn apply_fetch(&mut self, result: Result<Vec<Entry>, FetchError>) -> Result<(), FetchError> {
        self.loading = false;
        match result {
            Ok(entries) => {
                self.last_error = None;
                self.load(entries);
                Ok(())
            }
            Err(err) => {
                warn!(
                    error = %err,
                    source = ?self.source,
                    "Failed to refresh list, keeping previous entries"
                );
                self.last_error = Some(err.clone());
                self.publish();
                Err(err)
            }
        }
    }

    pub async fn refresh(&mut self, fetcher: &Fetcher) -> Result<(), FetchError> {
        let source = self.begin_fetch();
        let result = fetcher.list_data(source).await.map(|data| {
            self.caption = data.caption;
            data.entries
        });
        self.apply_fetch(result)
    }

    fn apply_filter(&mut self) {
        let query = self.filter_query.to_lowercase();
        self.filtered = self
            .all_entries
            .iter()
            .filter(|e| query.is_empty() || e.code.to_lowercase().contains(&query))
            .cloned()
            .collect();

        self.current_page = 0;
        self.displayed_len = self.page_end();
        self.has_more = self.filtered.len() > self.displayed_len;
        self.publish();
    }

    fn page_end(&self) -> usize {
        ((self.current_page + 1) * self.page_size).min(self.filtered.len())
    }

    fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            displayed: self.displayed().to_vec(),
            has_more: self.has_more,
            filter_query: self.filter_query.clone(),
            caption: self.caption.clone(),
            loading: self.loading,
            last_error: self.last_error.clone(),
        }
    }

    fn publish(&self) {
        self.notify.send_replace(self.snapshot());
    }
}
