//! Persisted records and their display names

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

/// One persisted record
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Store-assigned, monotonically increasing
    pub id: i64,
    /// Store-assigned at insert (UTC)
    pub created_at: NaiveDateTime,
    /// Raw content as saved
    pub content: String,
    /// `content` parsed as JSON, if it parses
    pub parsed_content: Option<Value>,
}

impl Entry {
    pub fn new(id: i64, created_at: NaiveDateTime, content: String) -> Self {
        let parsed_content = serde_json::from_str(&content).ok();
        Self {
            id,
            created_at,
            content,
            parsed_content,
        }
    }

    /// Display name using the default field set
    pub fn display_name(&self) -> String {
        self.display_name_with(&DisplayFields::default())
    }

    /// Display name with app-specific fields.
    ///
    /// Precedence: the label field (with its amount), then the first present
    /// fallback field, then `Entry #<id> (<date>)`.
    pub fn display_name_with(&self, fields: &DisplayFields) -> String {
        if let Some(parsed) = &self.parsed_content {
            if let Some(label) = parsed.get(&fields.label_field) {
                let amount = parsed
                    .get(&fields.amount_field)
                    .map(value_text)
                    .unwrap_or_else(|| "?".to_string());
                return format!(
                    "\"{}\" ({} {})",
                    value_text(label),
                    amount,
                    fields.amount_unit
                );
            }

            if let Some(value) = fields
                .fallback_fields
                .iter()
                .find_map(|field| parsed.get(field))
            {
                return format!("\"{}\"", value_text(value));
            }
        }

        format!("Entry #{} ({})", self.id, self.created_at.format("%Y-%m-%d"))
    }
}

/// Strings print bare, everything else as JSON
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Which content fields name an entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayFields {
    pub label_field: String,
    pub amount_field: String,
    pub amount_unit: String,
    pub fallback_fields: Vec<String>,
}

impl Default for DisplayFields {
    fn default() -> Self {
        Self {
            label_field: "meal_name".to_string(),
            amount_field: "calories".to_string(),
            amount_unit: "cal".to_string(),
            fallback_fields: vec![
                "name".to_string(),
                "title".to_string(),
                "description".to_string(),
            ],
        }
    }
}
