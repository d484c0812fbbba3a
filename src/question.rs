//! Question authoring: typed candidate, rule table and business rules.
pub mod candidate;
pub mod messages;
pub mod rules;

pub use candidate::{QuestionCandidate, QuestionRecord};
pub use rules::{business_rules, field_rules, question_pipeline};
