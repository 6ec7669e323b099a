use std::sync::LazyLock;

use scraper::{Html, Selector};

static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p").expect("`p` is a valid selector")
});

/// Returns the text of every `<p>` element in document order, one paragraph
/// per line.
///
/// A paragraph's text is all the text beneath it, inline markup included.
/// Documents without paragraphs yield an empty string.
pub fn paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
