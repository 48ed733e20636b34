use super::ui;
use crate::core::{Fetcher, ListSource};
use crate::store::{ConversionController, ConversionSnapshot, ListStore, ResponseOrdering, Side};
use anyhow::{Context, Result, anyhow, bail};

pub async fn run(
    fetcher: &Fetcher,
    ordering: ResponseOrdering,
    page_size: usize,
    amount: &str,
    from: &str,
    to: &str,
) -> Result<()> {
    let mut currencies = ListStore::new(ListSource::Currencies, page_size);
    let pb = ui::new_spinner("Fetching currencies...");
    let refreshed = currencies.refresh(fetcher).await;
    pb.finish_and_clear();
    refreshed.context("Failed to fetch currency list")?;

    let mut controller = ConversionController::new(fetcher.clone(), ordering)
        .context("Failed to start conversion")?;
    let mut updates = controller.subscribe();

    for (side, input) in [(Side::From, from), (Side::To, to)] {
        let (pick, pending) = controller.begin_pick(side);
        let code = find_code(&mut currencies, input)
            .ok_or_else(|| anyhow!("Unknown currency: {input}"))?;
        if !pick.choose(code) || !controller.finish_pick(pending).await {
            bail!("Currency selection for '{input}' was cancelled");
        }
    }

    controller.set_amount_text(amount);
    if controller.amount() <= 0.0 {
        bail!("Amount must be a positive number, got '{amount}'");
    }

    let pb = ui::new_spinner("Converting...");
    controller.settle().await;
    pb.finish_and_clear();

    let snapshot = updates.borrow_and_update().clone();
    if let Some(err) = snapshot.last_error.clone() {
        return Err(err).context("Conversion failed");
    }
    println!("{}", render(&snapshot)?);
    Ok(())
}

/// Looks `input` up in a currency list, case-insensitively, paging through
/// the filtered rows until an exact code match is found.
pub fn find_code(store: &mut ListStore, input: &str) -> Option<String> {
    let needle = input.trim();
    store.set_filter(needle);
    loop {
        let found = (0..store.displayed().len())
            .filter_map(|i| store.code_at(i))
            .find(|code| code.eq_ignore_ascii_case(needle))
            .map(str::to_string);
        if found.is_some() {
            return found;
        }
        if !store.load_more() {
            return None;
        }
    }
}

pub fn render(snapshot: &ConversionSnapshot) -> Result<String> {
    let result = snapshot.result.context("No conversion result")?;
    let from = snapshot.from.as_deref().unwrap_or_default();
    let to = snapshot.to.as_deref().unwrap_or_default();
    Ok(format!(
        "{} {} = {} {}",
        snapshot.amount,
        ui::style_text(from, ui::StyleType::TotalLabel),
        ui::style_text(&result.to_string(), ui::StyleType::TotalValue),
        ui::style_text(to, ui::StyleType::TotalLabel),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Entry;

    fn currency_store(page_size: usize) -> ListStore {
        let mut store = ListStore::new(ListSource::Currencies, page_size);
        store.load(vec![
            Entry::label("AUD", "Australian Dollar"),
            Entry::label("EUR", "Euro"),
            Entry::label("USD", "United States Dollar"),
            Entry::label("GBP", "British Pound"),
        ]);
        store
    }

    #[test]
    fn test_find_code_is_case_insensitive() {
        let mut store = currency_store(10);
        assert_eq!(find_code(&mut store, " usd "), Some("USD".to_string()));
        assert_eq!(find_code(&mut store, "Eur"), Some("EUR".to_string()));
        assert_eq!(find_code(&mut store, "US"), None);
        assert_eq!(find_code(&mut store, "XYZ"), None);
    }

    #[test]
    fn test_find_code_pages_through_matches() {
        let mut store = ListStore::new(ListSource::Currencies, 1);
        store.load(vec![
            Entry::label("AAD", "First"),
            Entry::label("BAD", "Third"),
            Entry::label("AD", "Second"),
        ]);
        assert_eq!(find_code(&mut store, "ad"), Some("AD".to_string()));
        assert_eq!(store.displayed().len(), 2);
        assert_eq!(find_code(&mut store, "bad"), Some("BAD".to_string()));
    }

    #[test]
    fn test_render_result() {
        console::set_colors_enabled(false);
        let snapshot = ConversionSnapshot {
            from: Some("USD".to_string()),
            to: Some("EUR".to_string()),
            amount: 10.0,
            result: Some(9.5),
            ..Default::default()
        };
        assert_eq!(render(&snapshot).unwrap(), "10 USD = 9.5 EUR");
        assert!(render(&ConversionSnapshot::default()).is_err());
    }
}
