//! Rendering of command results.

use std::io::Write;

use crossterm::style::Stylize;
use serde_json::{Map, Value};

use crate::error::CliError;

const LABEL_WIDTH: usize = 20;

/// One labelled value in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub title: Option<String>,
    pub fields: Vec<Field>,
}

/// Result of one command, built without touching the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub banner: String,
    pub sections: Vec<Section>,
    /// Machine-readable payload that replaces the fields in JSON mode.
    pub listing: Option<Value>,
}

impl Report {
    #[must_use]
    pub fn new(banner: impl Into<String>) -> Self {
        Self {
            banner: banner.into(),
            sections: vec![Section::default()],
            listing: None,
        }
    }

    /// Appends a field to the most recent section.
    #[must_use]
    pub fn field(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = Field {
            label: label.into(),
            value: value.into(),
        };
        match self.sections.last_mut() {
            Some(section) => section.fields.push(field),
            None => self.sections.push(Section {
                title: None,
                fields: vec![field],
            }),
        }
        self
    }

    #[must_use]
    pub fn section(mut self, title: impl Into<String>) -> Self {
        if self
            .sections
            .last()
            .is_some_and(|s| s.title.is_none() && s.fields.is_empty())
        {
            self.sections.pop();
        }
        self.sections.push(Section {
            title: Some(title.into()),
            fields: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn with_listing(mut self, listing: Value) -> Self {
        self.listing = Some(listing);
        self
    }

    /// Value of the first field named `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.label == label)
            .map(|f| &f.value)
    }

    /// Single-line JSON: the listing when present, else all fields under snake_case keys.
    #[must_use]
    pub fn to_json(&self) -> Value {
        if let Some(listing) = &self.listing {
            return listing.clone();
        }

        let object = self
            .sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .map(|f| (snake_case(&f.label), f.value.clone()))
            .collect::<Map<_, _>>();

        Value::Object(object)
    }

    /// Styled multi-line text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", format!(" {} ", self.banner).bold().on_blue());

        for section in &self.sections {
            if let Some(title) = &section.title {
                out.push('\n');
                out.push_str(&format!("{}\n", title.as_str().bold()));
            }
            for field in &section.fields {
                out.push_str(&format!(
                    "{:<LABEL_WIDTH$}{}\n",
                    format!("{}:", field.label),
                    display_value(&field.value)
                ));
            }
        }

        out
    }
}

fn snake_case(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Scalars inline; objects and arrays pretty-printed and aligned under the value column.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "-".to_owned(),
        Value::Object(_) | Value::Array(_) => serde_json::to_string_pretty(value)
            .unwrap_or_else(|_| value.to_string())
            .replace('\n', &format!("\n{:LABEL_WIDTH$}", "")),
        other => other.to_string(),
    }
}

/// Collaborator that shows a [`Report`] to the operator.
pub trait Presenter {
    /// # Errors
    /// Returns error if the report cannot be encoded or written.
    fn present(&self, report: &Report) -> Result<(), CliError>;
}

/// Writes reports to stdout, as JSON or styled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalPresenter {
    json: bool,
    enabled: bool,
}

impl TerminalPresenter {
    #[must_use]
    pub const fn new(json: bool, enabled: bool) -> Self {
        Self { json, enabled }
    }

    /// Text that [`Presenter::present`] would print, `None` when output is disabled.
    ///
    /// # Errors
    /// Returns error if the JSON encoding fails.
    pub fn render(&self, report: &Report) -> Result<Option<String>, CliError> {
        if !self.enabled {
            return Ok(None);
        }

        if self.json {
            return Ok(Some(format!("{}\n", serde_json::to_string(&report.to_json())?)));
        }

        Ok(Some(report.to_text()))
    }
}

impl Presenter for TerminalPresenter {
    fn present(&self, report: &Report) -> Result<(), CliError> {
        let Some(rendered) = self.render(report)? else {
            return Ok(());
        };

        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|source| CliError::Io {
                path: "stdout".into(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Report {
        Report::new("Deposit made")
            .field("Contract Address", "wasm1escrow")
            .field("Transaction Hash", "ABCD")
            .field("Gas Used", 1200)
    }

    #[test]
    fn json_mode_uses_snake_case_keys() {
        let rendered = TerminalPresenter::new(true, true)
            .render(&sample())
            .expect("render")
            .expect("enabled");

        assert_eq!(rendered.lines().count(), 1);
        let value: Value = serde_json::from_str(&rendered).expect("json");
        assert_eq!(
            value,
            json!({"contract_address": "wasm1escrow", "transaction_hash": "ABCD", "gas_used": 1200})
        );
    }

    #[test]
    fn listing_replaces_fields_in_json_mode() {
        let report = Report::new("Requests")
            .section("[created] wasm1a")
            .field("Token", "wasm1token")
            .with_listing(json!([{"address": "wasm1a"}]));

        assert_eq!(report.to_json(), json!([{"address": "wasm1a"}]));
    }

    #[test]
    fn text_mode_pads_labels() {
        let text = sample().to_text();

        assert!(text.contains("Deposit made"));
        assert!(text.contains(&format!("{:<20}wasm1escrow", "Contract Address:")));
        assert!(text.contains(&format!("{:<20}1200", "Gas Used:")));
    }

    #[test]
    fn sections_replace_the_empty_leading_section() {
        let report = Report::new("Requests").section("[created] wasm1a").field("Courier", "Not applied");

        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].title.as_deref(), Some("[created] wasm1a"));
        assert_eq!(report.get("Courier"), Some(&json!("Not applied")));
    }

    #[test]
    fn text_mode_pretty_prints_nested_values() {
        let text = Report::new("Query")
            .field("Result", json!({"status": "created", "funds": ["10", "5"]}))
            .to_text();

        let indent = " ".repeat(LABEL_WIDTH);
        assert!(text.contains(&format!("{:<20}{{\n{indent}  \"funds\": [\n", "Result:")));
        assert!(text.contains(&format!("{indent}  \"status\": \"created\"\n{indent}}}\n")));
        assert!(!text.contains(r#"{"funds""#));
    }

    #[test]
    fn disabled_presenter_prints_nothing() {
        assert_eq!(
            TerminalPresenter::new(false, false).render(&sample()).expect("render"),
            None
        );
    }
}
