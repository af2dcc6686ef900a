//! CLI subcommand implementations for the predict-form binary.

pub mod config_cmd;
pub mod health_cmd;
pub mod output;
pub mod payload_cmd;
pub mod submit_cmd;

use std::path::Path;

use anyhow::{Context, Result};
use predict_form::{FieldList, FormSource, HtmlForm};

/// Default `id` of the form on the page.
pub const DEFAULT_FORM_ID: &str = "predictForm";

/// Parse a `NAME=VALUE` assignment. The value may be empty or contain `=`.
pub fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got {s:?}")),
    }
}

/// Build the form to submit.
///
/// With a page, the form is read from the HTML and `sets` act as user
/// input on it. Without one, `sets` are the whole form.
pub fn load_form(
    page: Option<&Path>,
    form_id: &str,
    sets: &[(String, String)],
) -> Result<Box<dyn FormSource>> {
    match page {
        Some(path) => {
            let html = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read page {}", path.display()))?;
            let mut form = HtmlForm::parse(&html, form_id)?;
            for (name, value) in sets {
                form.set(name, value);
            }
            Ok(Box::new(form))
        }
        None => Ok(Box::new(
            sets.iter()
                .map(|(n, v)| (n.as_str(), v.as_str()))
                .collect::<FieldList>(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("MedInc=8.3"),
            Ok(("MedInc".to_string(), "8.3".to_string()))
        );
        assert_eq!(
            parse_assignment("expr=a=b"),
            Ok(("expr".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_assignment("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn test_load_form_from_page_applies_sets() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        std::fs::write(
            &page,
            r#"<form id="predictForm"><input name="MedInc" value="1"><input name="HouseAge" value="2"></form>"#,
        )
        .unwrap();

        let form = load_form(
            Some(&page),
            DEFAULT_FORM_ID,
            &[("HouseAge".to_string(), "30".to_string())],
        )
        .unwrap();
        assert_eq!(
            form.entries(),
            vec![
                ("MedInc".to_string(), "1".to_string()),
                ("HouseAge".to_string(), "30".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_form_without_page_uses_sets() {
        let form = load_form(None, DEFAULT_FORM_ID, &[("a".to_string(), "1".to_string())]).unwrap();
        assert_eq!(form.entries(), vec![("a".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_load_form_missing_form_id() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        std::fs::write(&page, "<form id=\"other\"></form>").unwrap();
        assert!(load_form(Some(&page), DEFAULT_FORM_ID, &[]).is_err());
    }
}
