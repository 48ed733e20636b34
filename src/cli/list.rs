use super::ui;
use crate::core::{Fetcher, ListSource};
use crate::store::{ListSnapshot, ListStore};
use anyhow::{Context, Result};

pub async fn run(
    fetcher: &Fetcher,
    source: ListSource,
    page_size: usize,
    filter: Option<&str>,
    pages: usize,
) -> Result<()> {
    let mut store = ListStore::new(source, page_size);
    let mut updates = store.subscribe();

    let pb = ui::new_spinner(match source {
        ListSource::Rates => "Fetching latest rates...",
        ListSource::Currencies => "Fetching currencies...",
    });
    let refreshed = store.refresh(fetcher).await;
    pb.finish_and_clear();
    refreshed.with_context(|| format!("Failed to fetch {}", title(source)))?;

    if let Some(query) = filter {
        store.set_filter(query);
    }
    for _ in 1..pages.max(1) {
        if !store.load_more() {
            break;
        }
    }

    let snapshot = updates.borrow_and_update().clone();
    println!("{}", render(&snapshot, source, store.filtered_len(), pages));
    Ok(())
}

fn title(source: ListSource) -> &'static str {
    match source {
        ListSource::Rates => "Exchange Rates",
        ListSource::Currencies => "Currencies",
    }
}

pub fn render(
    snapshot: &ListSnapshot,
    source: ListSource,
    filtered_total: usize,
    pages: usize,
) -> String {
    let mut output = format!("{}\n", ui::style_text(title(source), ui::StyleType::Title));

    let mut details = Vec::new();
    let caption = &snapshot.caption;
    if let Some(base) = &caption.base {
        details.push(format!("Base: {base}"));
    }
    if let Some(date) = caption.date {
        details.push(format!("Date: {date}"));
    }
    if !snapshot.filter_query.is_empty() {
        details.push(format!("Filter: '{}'", snapshot.filter_query));
    }
    if !details.is_empty() {
        output.push_str(&ui::style_text(&details.join("  "), ui::StyleType::Subtle));
        output.push('\n');
    }

    if snapshot.displayed.is_empty() {
        output.push_str(&ui::style_text("No entries to display", ui::StyleType::Error));
        return output;
    }

    let value_header = match source {
        ListSource::Rates => "Rate",
        ListSource::Currencies => "Name",
    };
    output.push('\n');
    output.push_str(&ui::entries_table(&snapshot.displayed, value_header).to_string());
    output.push_str(&format!(
        "\n\n{} {} of {}",
        ui::style_text("Showing", ui::StyleType::TotalLabel),
        snapshot.displayed.len(),
        filtered_total
    ));
    if snapshot.has_more {
        output.push_str(&ui::style_text(
            &format!(" (more available, use --pages {})", pages.max(1) + 1),
            ui::StyleType::Subtle,
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Entry, RatesCaption};
    use chrono::NaiveDate;

    fn snapshot(displayed: Vec<Entry>, has_more: bool, filter: &str) -> ListSnapshot {
        ListSnapshot {
            displayed,
            has_more,
            filter_query: filter.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_with_more_pages() {
        console::set_colors_enabled(false);
        let mut view = snapshot(vec![Entry::number("USD", 1.1)], true, "us");
        view.caption = RatesCaption {
            base: Some("EUR".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 8, 13),
        };
        let output = render(&view, ListSource::Rates, 12, 1);
        assert!(output.contains("Exchange Rates"));
        assert!(output.contains("Base: EUR"));
        assert!(output.contains("Date: 2024-08-13"));
        assert!(output.contains("Filter: 'us'"));
        assert!(output.contains("Showing 1 of 12"));
        assert!(output.contains("--pages 2"));
    }

    #[test]
    fn test_render_empty() {
        console::set_colors_enabled(false);
        let output = render(
            &snapshot(vec![], false, "zz"),
            ListSource::Currencies,
            0,
            1,
        );
        assert!(output.contains("Currencies"));
        assert!(output.contains("No entries to display"));
        assert!(!output.contains("Showing"));
    }
}
