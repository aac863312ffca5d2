use std::fmt::Write as _;

use chrono::Local;
use odvoz_core::{model::WasteCategory, store::StoreStatus};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="sl">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Odvoz odpadkov</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 40rem; color: #1f2933; }
    .category { display: flex; align-items: center; gap: 1rem; padding: 1rem; margin-bottom: 1rem; border-radius: .5rem; background: #f5f7fa; }
    .category img { width: 3rem; height: 3rem; }
    .label { font-weight: 600; }
    .date { font-size: 1.25rem; }
    footer { color: #7b8794; font-size: .875rem; }
  </style>
</head>
<body>
  <h1>Naslednji odvoz odpadkov</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Render the collection dates page for the current store contents.
pub(crate) fn render(status: &StoreStatus) -> String {
    let mut page = String::from(PAGE_HEAD);

    for category in WasteCategory::ALL {
        let reading = status.snapshot.reading(category);
        let code = category.site_code();
        // writing into a String cannot fail
        let _ignored = write!(
            page,
            concat!(
                "  <section class=\"category {code}\" aria-label=\"{name}\">\n",
                "    <img src=\"/static/{code}.svg\" alt=\"\">\n",
                "    <div>\n",
                "      <div class=\"label\">{label}</div>\n",
                "      <div class=\"date\">{date}</div>\n",
                "    </div>\n",
                "  </section>\n",
            ),
            code = code,
            name = category.display_name(),
            label = escape(&reading.label),
            date = escape(&reading.date),
        );
    }

    let refreshed = status.last_updated.map_or_else(
        || "še ni podatkov".to_owned(),
        |at| at.with_timezone(&Local).format("%d. %m. %Y %H:%M").to_string(),
    );
    let _ignored = writeln!(page, "  <footer>Osveženo: {refreshed}</footer>");

    page.push_str(PAGE_TAIL);
    page
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
