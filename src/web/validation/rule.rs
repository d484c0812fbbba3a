use crate::erx::{Erx, ResultE};
use crate::tools::validator::{Len, Obj};
use crate::web::validation::FieldErrors;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Borrowed view of one candidate field as the rule runner sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
}

/// A coerced, typed record that exposes its fields by name to the rule runner.
///
/// `None` means the candidate has no such field at all, which is a shape
/// problem rather than a validation failure.
pub trait Candidate {
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

pub type Predicate = fn(&FieldValue<'_>) -> bool;

/// 验证规则种类
#[derive(Debug, Clone, Copy)]
pub enum RuleKind {
    MaxLength(u64),
    MinLength(u64),
    NotEmpty,
    /// passes when the predicate returns true
    Custom(Predicate),
}

/// Validation group, a named subset of rules for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    All,
    Add,
    Edit,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::All => "all",
            Group::Add => "add",
            Group::Edit => "edit",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Group::All),
            "add" => Ok(Group::Add),
            "edit" => Ok(Group::Edit),
            _ => Err(format!("unknown validation group: {}", s)),
        }
    }
}

impl RuleKind {
    pub fn passes(&self, value: &FieldValue<'_>) -> bool {
        match (self, value) {
            (RuleKind::MaxLength(max), FieldValue::Text(s)) => Len::max(s, *max),
            (RuleKind::MaxLength(max), FieldValue::List(items)) => Len::items_max(items, *max),
            (RuleKind::MinLength(min), FieldValue::Text(s)) => Len::min(s, *min),
            (RuleKind::MinLength(min), FieldValue::List(items)) => Len::items_min(items, *min),
            (RuleKind::NotEmpty, FieldValue::Text(s)) => !Obj::empty(s),
            (RuleKind::NotEmpty, FieldValue::List(items)) => !items.is_empty(),
            (RuleKind::Custom(predicate), value) => predicate(value),
        }
    }
}

/// One row of the rule table. Immutable once built.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    field: String,
    kind: RuleKind,
    message: String,
    group: Group,
}

impl ValidationRule {
    /// rule applying to every group
    pub fn new(field: &str, kind: RuleKind, message: &str) -> Self {
        Self { field: field.to_string(), kind, message: message.to_string(), group: Group::All }
    }

    pub fn in_group(mut self, group: Group) -> Self {
        self.group = group;
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn applies_to(&self, group: Group) -> bool {
        self.group == Group::All || self.group == group
    }
}

/// Runs a rule table against a candidate.
#[derive(Debug, Clone, Default)]
pub struct FieldValidator {
    rules: Vec<ValidationRule>,
}

impl FieldValidator {
    pub fn new(rules: Vec<ValidationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// evaluate every rule of `group` in declaration order
    /// # Returns
    /// * `Ok(FieldErrors)` - possibly empty, failures are data not errors
    /// * `Err(Erx)` - malformed: a rule names a field the candidate lacks
    pub fn check<C: Candidate>(&self, candidate: &C, group: Group) -> ResultE<FieldErrors> {
        let mut errors = FieldErrors::new();

        for rule in self.rules.iter().filter(|r| r.applies_to(group)) {
            let value = candidate
                .field(rule.field())
                .ok_or_else(|| Erx::malformed(&format!("candidate has no field `{}`", rule.field())))?;

            if !rule.kind.passes(&value) {
                errors.add(rule.field(), rule.message());
            }
        }

        Ok(errors)
    }
}
