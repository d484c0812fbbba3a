use crate::conf;
use crate::question::candidate::QuestionCandidate;
use crate::question::messages;
use crate::tools::validator::{Enc, Obj};
use crate::web::validation::{BusinessRuleChecker, FieldValidator, FieldValue, FormPipeline, Group, RuleKind, ValidationRule};

fn media_id_format(value: &FieldValue<'_>) -> bool {
    match value {
        FieldValue::Text(s) => s.is_empty() || Enc::slug(s),
        FieldValue::List(_) => false,
    }
}

/// Per-field rule table, limits taken from `rules`.
pub fn field_rules(rules: &conf::Rules) -> FieldValidator {
    FieldValidator::new(vec![
        ValidationRule::new("value", RuleKind::NotEmpty, messages::VALUE_EMPTY),
        ValidationRule::new("value", RuleKind::MinLength(rules.value_min_length), messages::VALUE_MIN_LENGTH),
        ValidationRule::new("value", RuleKind::MaxLength(rules.value_max_length), messages::VALUE_MAX_LENGTH),
        ValidationRule::new("answers", RuleKind::MinLength(rules.min_answers), messages::ANSWERS_MIN),
        ValidationRule::new("explanation", RuleKind::MaxLength(rules.explanation_max_length), messages::EXPLANATION_MAX_LENGTH),
        ValidationRule::new("suggestions", RuleKind::MaxLength(rules.suggestions_max_length), messages::SUGGESTIONS_MAX_LENGTH),
        ValidationRule::new("mediaId", RuleKind::Custom(media_id_format), messages::MEDIA_ID_FORMAT),
        ValidationRule::new("quizId", RuleKind::NotEmpty, messages::QUIZ_ID_EMPTY).in_group(Group::Add),
        ValidationRule::new("id", RuleKind::NotEmpty, messages::ID_EMPTY).in_group(Group::Edit),
    ])
}

/// Cross-field rules the table cannot express.
pub fn business_rules(rules: &conf::Rules) -> BusinessRuleChecker<QuestionCandidate> {
    let max_blank = rules.max_blank_answers;

    BusinessRuleChecker::new()
        .rule("correctAnswers", messages::CORRECT_ANSWERS_EMPTY, |q: &QuestionCandidate| q.correct_indexes.is_empty())
        .rule("answers", messages::ANSWERS_TOO_MANY_BLANK, move |q: &QuestionCandidate| q.blank_answers() > max_blank)
        .rule("correctAnswers", messages::CORRECT_ANSWERS_BLANK, |q: &QuestionCandidate| {
            q.correct_answers.iter().any(|a| Obj::empty(a))
        })
        .rule("alternativeText", messages::ALTERNATIVE_TEXT_EMPTY, |q: &QuestionCandidate| {
            q.media_id.is_some() && Obj::empty(&q.alternative_text)
        })
}

pub fn question_pipeline(rules: &conf::Rules) -> FormPipeline<QuestionCandidate> {
    FormPipeline::new("question", field_rules(rules), business_rules(rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::input::SubmittedForm;

    fn candidate(body: &str) -> QuestionCandidate {
        QuestionCandidate::from_form(&SubmittedForm::parse(body), "quiz-1", None).unwrap()
    }

    fn valid() -> QuestionCandidate {
        candidate("value=Which+planet+is+largest%3F&answers=Jupiter&answers=Mars&answers=&correctAnswers=0")
    }

    #[test]
    fn test_short_value_no_correct_many_blanks() {
        let c = candidate("value=short&answers[]=a&answers[]=&answers[]=&answers[]=&answers[]=");
        let report = question_pipeline(&conf::Rules::default()).run(&c, Group::Add).unwrap();

        assert!(report.size() >= 2);
        assert_eq!(report.field("value").unwrap(), [messages::VALUE_MIN_LENGTH]);
        assert_eq!(report.field("correctAnswers").unwrap(), [messages::CORRECT_ANSWERS_EMPTY]);
        assert_eq!(report.field("answers").unwrap(), [messages::ANSWERS_TOO_MANY_BLANK]);
        assert_eq!(report.size(), 3);
    }

    #[test]
    fn test_blank_limit_is_exclusive() {
        let c = candidate("value=Which+one+is+right%3F&answers=a&answers=b&answers=&answers=&answers=&correctAnswers=0");
        let report = question_pipeline(&conf::Rules::default()).run(&c, Group::Add).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_media_without_alternative_text() {
        let mut c = valid();
        c.media_id = Some("abc".into());
        c.alternative_text = String::new();

        let report = question_pipeline(&conf::Rules::default()).run(&c, Group::Add).unwrap();
        assert_eq!(report.field("alternativeText").unwrap(), [messages::ALTERNATIVE_TEXT_EMPTY]);
        assert_eq!(report.size(), 1);
    }

    #[test]
    fn test_media_id_format() {
        let c = candidate("value=Which+planet+is+largest%3F&answers=a&answers=b&correctAnswers=1&mediaId=not+a+slug&alternativeText=alt");
        let report = question_pipeline(&conf::Rules::default()).run(&c, Group::Add).unwrap();
        assert_eq!(report.field("mediaId").unwrap(), [messages::MEDIA_ID_FORMAT]);
    }

    #[test]
    fn test_correct_answer_pointing_at_blank() {
        let c = candidate("value=Which+planet+is+largest%3F&answers=a&answers=b&answers=&correctAnswers=2");
        let report = question_pipeline(&conf::Rules::default()).run(&c, Group::Add).unwrap();
        assert_eq!(report.field("correctAnswers").unwrap(), [messages::CORRECT_ANSWERS_BLANK]);
    }

    #[test]
    fn test_valid_candidate_is_idempotent() {
        let pipeline = question_pipeline(&conf::Rules::default());
        let c = valid();
        let first = pipeline.run(&c, Group::Add).unwrap();
        let second = pipeline.run(&c, Group::Add).unwrap();
        assert_eq!(first.size(), 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_groups_select_identity_rules() {
        let pipeline = question_pipeline(&conf::Rules::default());

        let mut c = valid();
        c.quiz_id = String::new();
        assert!(pipeline.run(&c, Group::Add).unwrap().field("quizId").is_some());
        // edit does not check quizId but requires the question id
        let edit = pipeline.run(&c, Group::Edit).unwrap();
        assert!(edit.field("quizId").is_none());
        assert_eq!(edit.field("id").unwrap(), [messages::ID_EMPTY]);
    }

    #[test]
    fn test_limits_follow_configuration() {
        let rules = conf::Rules { value_min_length: 3, max_blank_answers: 0, ..Default::default() };
        let c = candidate("value=abcd&answers=a&answers=&correctAnswers=0");
        let report = question_pipeline(&rules).run(&c, Group::Add).unwrap();
        assert!(report.field("value").is_none());
        assert_eq!(report.field("answers").unwrap(), [messages::ANSWERS_TOO_MANY_BLANK]);
    }
}
