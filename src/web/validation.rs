pub mod aggregate;
pub mod business;
pub mod pipeline;
pub mod rule;

pub use aggregate::ErrorAggregator;
pub use business::BusinessRuleChecker;
pub use pipeline::FormPipeline;
pub use rule::{Candidate, FieldValidator, FieldValue, Group, RuleKind, ValidationRule};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 字段错误
/// field name -> message keys, in rule evaluation order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// single key fragment, the shape business rules produce
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// messages of `other` go after the ones already present for the same key
    pub fn append(&mut self, other: FieldErrors) {
        for (field, mut messages) in other.0 {
            self.0.entry(field).or_default().append(&mut messages);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|m| m.as_slice())
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some_and(|m| !m.is_empty())
    }

    /// count of keys carrying at least one message
    pub fn populated(&self) -> usize {
        self.0.values().filter(|m| !m.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl FromIterator<(String, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for (field, message) in iter {
            errors.add(field, message);
        }
        errors
    }
}

/// 验证结果
///
/// `size` is derived from `fields` whenever a report is built, including when
/// it is read back from the flash store, so it can not drift from the map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReportFields")]
pub struct ErrorReport {
    fields: FieldErrors,
    size: usize,
}

#[derive(Deserialize)]
struct ReportFields {
    #[serde(default)]
    fields: FieldErrors,
}

impl From<ReportFields> for ErrorReport {
    fn from(value: ReportFields) -> Self {
        value.fields.into()
    }
}

impl From<FieldErrors> for ErrorReport {
    fn from(fields: FieldErrors) -> Self {
        let size = fields.populated();
        ErrorReport { fields, size }
    }
}

impl ErrorReport {
    pub fn fields(&self) -> &FieldErrors {
        &self.fields
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// the sole success signal
    pub fn is_valid(&self) -> bool {
        self.size == 0
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name)
    }

    pub fn into_fields(self) -> FieldErrors {
        self.fields
    }
}
