use crate::erx::{Erx, ResultE};
use crate::tools::validator::Obj;
use crate::web::input::SubmittedForm;
use crate::web::validation::{Candidate, FieldValue};
use serde::{Deserialize, Serialize};

/// A submitted question, coerced into its target shape but not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCandidate {
    /// empty when adding
    pub id: String,
    pub quiz_id: String,
    pub value: String,
    /// every option as submitted, blanks included
    pub answers: Vec<String>,
    /// positions in `answers` ticked as correct
    pub correct_indexes: Vec<usize>,
    /// texts at `correct_indexes`
    pub correct_answers: Vec<String>,
    pub explanation: String,
    pub suggestions: String,
    pub alternative_text: String,
    pub media_id: Option<String>,
}

impl QuestionCandidate {
    /// Build the candidate from the raw form.
    ///
    /// `value` and `answers` must have been submitted and each `correctAnswers`
    /// entry must be an index into `answers`; otherwise the form is malformed.
    /// Unticked checkboxes and empty optional inputs are simply absent.
    pub fn from_form(form: &SubmittedForm, quiz_id: &str, question_id: Option<&str>) -> ResultE<Self> {
        if !form.contains("value") {
            return Err(Erx::malformed("question form without `value`"));
        }

        let answers = form.all("answers").ok_or_else(|| Erx::malformed("question form without `answers`"))?.to_vec();

        let mut correct_indexes = Vec::new();
        for raw in form.all("correctAnswers").unwrap_or_default() {
            let index = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|i| *i < answers.len())
                .ok_or_else(|| Erx::malformed(&format!("correctAnswers entry `{}` is not an answer index", raw)))?;
            if !correct_indexes.contains(&index) {
                correct_indexes.push(index);
            }
        }
        let correct_answers = correct_indexes.iter().map(|i| answers[*i].clone()).collect();

        let media_id = Some(form.text("mediaId").trim().to_string()).filter(|m| !m.is_empty());

        Ok(QuestionCandidate {
            id: question_id.unwrap_or_default().to_string(),
            quiz_id: quiz_id.to_string(),
            value: form.text("value"),
            answers,
            correct_indexes,
            correct_answers,
            explanation: form.text("explanation"),
            suggestions: form.text("suggestions"),
            alternative_text: form.text("alternativeText"),
            media_id,
        })
    }

    pub fn blank_answers(&self) -> usize {
        Obj::count_empty(&self.answers)
    }
}

impl Candidate for QuestionCandidate {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = match name {
            "id" => FieldValue::Text(&self.id),
            "quizId" => FieldValue::Text(&self.quiz_id),
            "value" => FieldValue::Text(&self.value),
            "answers" => FieldValue::List(&self.answers),
            "correctAnswers" => FieldValue::List(&self.correct_answers),
            "explanation" => FieldValue::Text(&self.explanation),
            "suggestions" => FieldValue::Text(&self.suggestions),
            "alternativeText" => FieldValue::Text(&self.alternative_text),
            "mediaId" => FieldValue::Text(self.media_id.as_deref().unwrap_or_default()),
            _ => return None,
        };
        Some(value)
    }
}

/// The validated record handed to the question service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub quiz_id: String,
    pub value: String,
    pub answers: Vec<String>,
    pub correct_answers: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub explanation: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub suggestions: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub media_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alternative_text: Option<String>,
}

impl From<QuestionCandidate> for QuestionRecord {
    fn from(c: QuestionCandidate) -> Self {
        let answers = c.answers.into_iter().map(|a| a.trim().to_string()).filter(|a| !a.is_empty()).collect();
        let correct_answers = c.correct_answers.into_iter().map(|a| a.trim().to_string()).collect();
        let alternative_text = c.media_id.as_ref().map(|_| c.alternative_text.trim().to_string());

        QuestionRecord {
            quiz_id: c.quiz_id,
            value: c.value.trim().to_string(),
            answers,
            correct_answers,
            explanation: c.explanation.trim().to_string(),
            suggestions: c.suggestions.trim().to_string(),
            media_id: c.media_id,
            alternative_text,
        }
    }
}
