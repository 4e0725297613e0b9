//! Typed queries over a parsed product page.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static BUTTON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button").expect("constant selector is valid"));

/// Elements whose text never reaches the reader.
const HIDDEN_TEXT_TAGS: [&str; 4] = ["script", "style", "template", "noscript"];

/// A parsed HTML page.
pub struct PageDocument {
    document: Html,
}

impl PageDocument {
    /// Parse an HTML string. Never fails; broken markup is repaired by the parser.
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// All visible text nodes joined by single spaces, lower-cased.
    pub fn visible_text(&self) -> String {
        let fragments: Vec<&str> = self
            .document
            .root_element()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| HIDDEN_TEXT_TAGS.contains(&el.name()))
                });
                (!hidden).then_some(&**text)
            })
            .collect();

        fragments.join(" ").to_lowercase()
    }

    /// The first `<button type="submit">` in document order.
    pub fn first_submit_button(&self) -> Option<SubmitButton<'_>> {
        self.document
            .select(&BUTTON)
            .find(|el| {
                el.value()
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("submit"))
            })
            .map(|element| SubmitButton { element })
    }
}

/// Handle to a submit button inside a [`PageDocument`].
pub struct SubmitButton<'a> {
    element: ElementRef<'a>,
}

impl SubmitButton<'_> {
    /// Button text: each fragment trimmed, fragments concatenated, lower-cased.
    pub fn text(&self) -> String {
        self.element
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<String>()
            .to_lowercase()
    }

    /// True if the button has a `disabled` attribute or a `disabled` class token.
    pub fn is_disabled(&self) -> bool {
        let el = self.element.value();
        el.attr("disabled").is_some() || el.classes().any(|class| class == "disabled")
    }
}
