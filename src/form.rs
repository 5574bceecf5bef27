// src/form.rs
//! Declarative add/edit form model. Pages describe their dialog as an
//! ordered field list; the model collects values, validates required
//! fields, and produces the submit payload. Submission is all-or-nothing:
//! with any required field blank, no payload is produced.

use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::Value;

use crate::utils::normalize_date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Number,
    Date,
    Url,
    Textarea,
    Select(Vec<SelectOption>),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub label: String,
    pub name: String,
    pub kind: FieldKind,
    pub placeholder: Option<String>,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(label: impl Into<String>, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            kind,
            placeholder: None,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub name: String,
    pub message: String,
}

#[derive(Debug)]
pub struct FormModel {
    mode: FormMode,
    fields: Vec<FieldSpec>,
    values: BTreeMap<String, String>,
}

impl FormModel {
    pub fn add(fields: Vec<FieldSpec>) -> Self {
        Self {
            mode: FormMode::Add,
            fields,
            values: BTreeMap::new(),
        }
    }

    /// Edit variant, pre-populated from an existing record. Date fields are
    /// normalized to `YYYY-MM-DD`; password fields are never prefilled, a
    /// blank password means "no change".
    pub fn edit(fields: Vec<FieldSpec>, record: &Value) -> Self {
        let mut form = Self {
            mode: FormMode::Edit,
            fields,
            values: BTreeMap::new(),
        };
        form.prefill(record);
        form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn prefill(&mut self, record: &Value) {
        for field in &self.fields {
            if matches!(field.kind, FieldKind::Password) {
                continue;
            }

            let value = match record.get(&field.name) {
                Some(Value::String(text)) => match field.kind {
                    FieldKind::Date => normalize_date(text),
                    _ => text.clone(),
                },
                Some(Value::Number(number)) => number.to_string(),
                Some(Value::Bool(flag)) => flag.to_string(),
                _ => continue,
            };

            self.values.insert(field.name.clone(), value);
        }
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        if self.field(name).is_none() {
            anyhow::bail!("Unknown form field: {}", name);
        }

        self.values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Displayed label for a select field's current value.
    pub fn select_label(&self, name: &str) -> Option<&str> {
        let field = self.field(name)?;
        let current = self.values.get(name)?;

        match &field.kind {
            FieldKind::Select(options) => options
                .iter()
                .find(|option| option.value == *current)
                .map(|option| option.label.as_str()),
            _ => None,
        }
    }

    fn is_blank(&self, name: &str) -> bool {
        self.values
            .get(name)
            .map(|value| value.trim().is_empty())
            .unwrap_or(true)
    }

    /// Required fields must be non-empty. In edit mode a blank password is
    /// allowed; it signals "keep the current secret".
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for field in &self.fields {
            if !field.required || !self.is_blank(&field.name) {
                continue;
            }
            if self.mode == FormMode::Edit && matches!(field.kind, FieldKind::Password) {
                continue;
            }

            errors.push(FieldError {
                name: field.name.clone(),
                message: format!("{} harus diisi!", field.label),
            });
        }

        errors
    }

    /// Current values as the outgoing payload. In edit mode blank password
    /// fields are omitted entirely, never sent empty.
    pub fn payload(&self) -> BTreeMap<String, String> {
        let mut payload = self.values.clone();

        if self.mode == FormMode::Edit {
            for field in &self.fields {
                if matches!(field.kind, FieldKind::Password) && self.is_blank(&field.name) {
                    payload.remove(&field.name);
                }
            }
        }

        payload
    }

    /// Validate, then build the payload. No partial submit: any error means
    /// no payload.
    pub fn submit(&self) -> std::result::Result<BTreeMap<String, String>, Vec<FieldError>> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self.payload())
        } else {
            Err(errors)
        }
    }

    /// Dialog close: drop everything the user typed.
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("Nama", "nama", FieldKind::Text).required(),
            FieldSpec::new("Email", "email", FieldKind::Email).required(),
            FieldSpec::new("Kata Sandi", "katasandi", FieldKind::Password).required(),
            FieldSpec::new("Tanggal Lahir", "tanggalLahir", FieldKind::Date),
            FieldSpec::new(
                "Peran",
                "peran",
                FieldKind::Select(vec![
                    SelectOption::new("siswa", "Siswa"),
                    SelectOption::new("alumni", "Alumni"),
                ]),
            )
            .required(),
        ]
    }

    #[test]
    fn missing_required_field_blocks_submit() {
        let mut form = FormModel::add(user_fields());
        form.set("nama", "Budi").unwrap();

        let errors = form.submit().unwrap_err();
        let names: Vec<&str> = errors.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"email"));
        assert!(names.contains(&"katasandi"));
        assert!(names.contains(&"peran"));
    }

    #[test]
    fn whitespace_only_counts_as_blank() {
        let mut form = FormModel::add(user_fields());
        form.set("nama", "   ").unwrap();

        let errors = form.validate();
        assert!(errors.iter().any(|e| e.name == "nama"));
        assert!(errors.iter().any(|e| e.message == "Nama harus diisi!"));
    }

    #[test]
    fn complete_form_submits_payload() {
        let mut form = FormModel::add(user_fields());
        form.set("nama", "Budi").unwrap();
        form.set("email", "budi@example.com").unwrap();
        form.set("katasandi", "rahasia").unwrap();
        form.set("peran", "siswa").unwrap();

        let payload = form.submit().unwrap();
        assert_eq!(payload.get("nama").map(String::as_str), Some("Budi"));
        assert_eq!(payload.get("katasandi").map(String::as_str), Some("rahasia"));
    }

    #[test]
    fn edit_allows_blank_password_and_omits_it() {
        let record = json!({
            "nama": "Budi",
            "email": "budi@example.com",
            "peran": "siswa",
            "katasandi": "never-prefilled"
        });

        let form = FormModel::edit(user_fields(), &record);
        assert_eq!(form.value("katasandi"), None);

        let payload = form.submit().unwrap();
        assert!(!payload.contains_key("katasandi"));
        assert_eq!(payload.get("nama").map(String::as_str), Some("Budi"));
    }

    #[test]
    fn edit_submits_replaced_password() {
        let record = json!({
            "nama": "Budi",
            "email": "budi@example.com",
            "peran": "siswa"
        });

        let mut form = FormModel::edit(user_fields(), &record);
        form.set("katasandi", "baru").unwrap();

        let payload = form.submit().unwrap();
        assert_eq!(payload.get("katasandi").map(String::as_str), Some("baru"));
    }

    #[test]
    fn add_mode_still_requires_password() {
        let mut form = FormModel::add(user_fields());
        form.set("nama", "Budi").unwrap();
        form.set("email", "budi@example.com").unwrap();
        form.set("peran", "siswa").unwrap();

        let errors = form.submit().unwrap_err();
        assert!(errors.iter().any(|e| e.name == "katasandi"));
    }

    #[test]
    fn prefill_normalizes_dates_and_numbers() {
        let record = json!({
            "nama": "Budi",
            "email": "budi@example.com",
            "peran": "siswa",
            "tanggalLahir": "2006-02-11T00:00:00.000Z"
        });

        let form = FormModel::edit(user_fields(), &record);
        assert_eq!(form.value("tanggalLahir"), Some("2006-02-11"));
    }

    #[test]
    fn select_label_resolves_through_options() {
        let mut form = FormModel::add(user_fields());
        form.set("peran", "alumni").unwrap();

        assert_eq!(form.select_label("peran"), Some("Alumni"));
        assert_eq!(form.select_label("nama"), None);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut form = FormModel::add(user_fields());
        assert!(form.set("nisn", "123").is_err());
    }

    #[test]
    fn reset_clears_values() {
        let mut form = FormModel::add(user_fields());
        form.set("nama", "Budi").unwrap();
        form.reset();
        assert_eq!(form.value("nama"), None);
    }
}
