//! Form sources: where the adapter reads field name/value pairs from.
//!
//! [`HtmlForm`] walks a `<form>` in an HTML document and collects the
//! pairs a browser would submit for it. [`FieldList`] is a plain in-memory
//! list for callers that already have the values.

use scraper::{ElementRef, Html, Selector};

use crate::types::{FormEntry, PredictError, PredictResult};

/// Anything that can yield the current `(name, value)` pairs of a form.
pub trait FormSource: Send + Sync {
    /// Current entries in document order. Names may repeat.
    fn entries(&self) -> Vec<FormEntry>;
}

/// An ordered in-memory list of form entries.
#[derive(Debug, Clone, Default)]
pub struct FieldList {
    entries: Vec<FormEntry>,
}

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FieldList {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

impl FormSource for FieldList {
    fn entries(&self) -> Vec<FormEntry> {
        self.entries.clone()
    }
}

/// Entries collected from a `<form>` element in an HTML document.
#[derive(Debug, Clone)]
pub struct HtmlForm {
    form_id: String,
    entries: Vec<FormEntry>,
}

impl HtmlForm {
    /// Locate `<form id="{form_id}">` in `html` and collect its entries.
    ///
    /// Only named, enabled `input`, `select`, and `textarea` elements
    /// contribute. Buttons and file inputs are skipped, checkboxes and
    /// radios only count when checked, and a single-choice `select` with
    /// nothing selected falls back to its first enabled option.
    pub fn parse(html: &str, form_id: &str) -> PredictResult<Self> {
        let document = Html::parse_document(html);
        let form_sel = Selector::parse("form").expect("form selector is valid");
        let field_sel =
            Selector::parse("input, select, textarea").expect("field selector is valid");

        let form = document
            .select(&form_sel)
            .find(|f| f.value().id() == Some(form_id))
            .ok_or_else(|| PredictError::FormNotFound(form_id.to_string()))?;

        let mut entries = Vec::new();
        for field in form.select(&field_sel) {
            let el = field.value();
            let name = el.attr("name").unwrap_or("");
            if name.is_empty() || el.attr("disabled").is_some() {
                continue;
            }

            match el.name() {
                "input" => {
                    let input_type = el.attr("type").unwrap_or("text").to_ascii_lowercase();
                    match input_type.as_str() {
                        "submit" | "button" | "reset" | "image" | "file" => {}
                        "checkbox" | "radio" => {
                            if el.attr("checked").is_some() {
                                let value = el.attr("value").unwrap_or("on");
                                entries.push((name.to_string(), value.to_string()));
                            }
                        }
                        _ => {
                            let value = el.attr("value").unwrap_or("");
                            entries.push((name.to_string(), value.to_string()));
                        }
                    }
                }
                "select" => {
                    for value in selected_options(&field) {
                        entries.push((name.to_string(), value));
                    }
                }
                "textarea" => {
                    entries.push((name.to_string(), field.text().collect()));
                }
                _ => {}
            }
        }

        tracing::debug!(form_id, fields = entries.len(), "collected form entries");

        Ok(Self {
            form_id: form_id.to_string(),
            entries,
        })
    }

    /// The `id` of the form these entries came from.
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// Set a field's value as if the user typed it.
    ///
    /// Every entry named `name` takes the new value; if there is none, the
    /// entry is appended.
    pub fn set(&mut self, name: &str, value: &str) {
        let mut found = false;
        for entry in self.entries.iter_mut().filter(|(n, _)| n == name) {
            entry.1 = value.to_string();
            found = true;
        }
        if !found {
            self.entries.push((name.to_string(), value.to_string()));
        }
    }
}

impl FormSource for HtmlForm {
    fn entries(&self) -> Vec<FormEntry> {
        self.entries.clone()
    }
}

fn selected_options(select: &ElementRef<'_>) -> Vec<String> {
    let option_sel = Selector::parse("option").expect("option selector is valid");
    let multiple = select.value().attr("multiple").is_some();

    let enabled: Vec<ElementRef<'_>> = select
        .select(&option_sel)
        .filter(|o| o.value().attr("disabled").is_none())
        .collect();
    let mut selected: Vec<&ElementRef<'_>> = enabled
        .iter()
        .filter(|o| o.value().attr("selected").is_some())
        .collect();

    if !multiple {
        // A single-choice select shows the last `selected` option, or the first one.
        selected = match selected.last() {
            Some(last) => vec![*last],
            None => enabled.first().into_iter().collect(),
        };
    }

    selected.into_iter().map(option_value).collect()
}

fn option_value(option: &ElementRef<'_>) -> String {
    match option.value().attr("value") {
        Some(v) => v.to_string(),
        None => element_text(option),
    }
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
