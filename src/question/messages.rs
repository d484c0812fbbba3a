// message keys, resolved to text by the view layer

pub const VALUE_EMPTY: &str = "validation.question.value.empty";
pub const VALUE_MIN_LENGTH: &str = "validation.question.value.minLength";
pub const VALUE_MAX_LENGTH: &str = "validation.question.value.maxLength";
pub const ANSWERS_MIN: &str = "validation.question.answers.min";
pub const ANSWERS_TOO_MANY_BLANK: &str = "validation.question.answers.tooManyBlank";
pub const CORRECT_ANSWERS_EMPTY: &str = "validation.question.correctAnswers.empty";
pub const CORRECT_ANSWERS_BLANK: &str = "validation.question.correctAnswers.blank";
pub const EXPLANATION_MAX_LENGTH: &str = "validation.question.explanation.maxLength";
pub const SUGGESTIONS_MAX_LENGTH: &str = "validation.question.suggestions.maxLength";
pub const MEDIA_ID_FORMAT: &str = "validation.question.mediaId.format";
pub const ALTERNATIVE_TEXT_EMPTY: &str = "validation.question.alternativeText.empty";
pub const QUIZ_ID_EMPTY: &str = "validation.question.quizId.empty";
pub const ID_EMPTY: &str = "validation.question.id.empty";
