use scraper::Html;

/// Concatenates the text nodes of an HTML document, dropping tags and attributes.
///
/// Plain text goes through unchanged. When parsing recovers no text at all
/// from non-blank input, the input is handed back as-is.
pub fn strip_markup(input: &str) -> String {
    let document = Html::parse_document(input);
    let text: String = document.root_element().text().collect();

    if text.trim().is_empty() && !input.trim().is_empty() {
        return input.to_string();
    }

    text
}
