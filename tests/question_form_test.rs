//! Question form flow driven through the router: validate, flash, redirect.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use lms_admin::app::AppBuilder;
use lms_admin::erx::{Erx, ResultE};
use lms_admin::question::QuestionRecord;
use lms_admin::service::QuestionService;
use lms_admin::tools::tests::tools::test_config_file;
use lms_admin::web::flash::MemoryFlashStore;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

#[derive(Default)]
struct StubQuestions {
    fail: bool,
    calls: Mutex<Vec<(String, Option<String>, QuestionRecord)>>,
}

#[async_trait]
impl QuestionService for StubQuestions {
    fn name(&self) -> &str {
        "stub"
    }

    async fn create(&self, record: &QuestionRecord) -> ResultE<String> {
        if self.fail {
            return Err(Erx::remote("quiz service responded 503"));
        }
        self.calls.lock().unwrap().push(("create".into(), None, record.clone()));
        Ok("question-1".into())
    }

    async fn update(&self, id: &str, record: &QuestionRecord) -> ResultE<String> {
        if self.fail {
            return Err(Erx::remote("quiz service responded 503"));
        }
        self.calls.lock().unwrap().push(("update".into(), Some(id.to_string()), record.clone()));
        Ok(id.to_string())
    }
}

struct Harness {
    router: Router,
    store: Arc<MemoryFlashStore>,
    questions: Arc<StubQuestions>,
    session: String,
}

fn harness(fail: bool) -> Harness {
    let conf = lms_admin::conf::load_file(&test_config_file()).unwrap();
    let store = Arc::new(MemoryFlashStore::new(&conf.session.prefix, Duration::from_secs(conf.session.ttl_secs)));
    let questions = Arc::new(StubQuestions { fail, ..Default::default() });

    let mut builder = AppBuilder::new(conf);
    builder.use_flash_store(store.clone()).use_question_service(questions.clone());
    let router = lms_admin::web::make_router(builder.build().unwrap());

    Harness { router, store, questions, session: uuid::Uuid::new_v4().to_string() }
}

impl Harness {
    fn cookie(&self) -> String {
        format!("lms_admin_session={}", self.session)
    }

    async fn post(&self, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::COOKIE, self.cookie())
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).header(header::COOKIE, self.cookie()).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

const ADD: &str = "/quizzes/quiz-1/questions/add";
const EDIT: &str = "/quizzes/quiz-1/questions/question-7/edit";

#[tokio::test]
async fn test_invalid_submission_flashes_and_redirects_back() {
    let h = harness(false);

    let body = "value=short&answers[]=a&answers[]=&answers[]=&answers[]=&answers[]=&explanation=because";
    let response = h.post(ADD, body).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), ADD);
    assert!(h.questions.calls.lock().unwrap().is_empty());
    assert_eq!(h.store.len(), 1);

    let (status, view) = h.get(ADD).await;
    assert_eq!(status, StatusCode::OK);
    let errors = &view["data"]["errors"];
    assert_eq!(errors["size"], 3);
    assert_eq!(errors["fields"]["value"][0], "validation.question.value.minLength");
    assert_eq!(errors["fields"]["correctAnswers"][0], "validation.question.correctAnswers.empty");
    assert_eq!(errors["fields"]["answers"][0], "validation.question.answers.tooManyBlank");

    // submitted values come back exactly as written
    let form = &view["data"]["form"];
    assert_eq!(form["value"], serde_json::json!(["short"]));
    assert_eq!(form["answers"], serde_json::json!(["a", "", "", "", ""]));
    assert_eq!(form["explanation"], serde_json::json!(["because"]));

    // read once
    let (_, again) = h.get(ADD).await;
    assert_eq!(again["data"]["errors"]["size"], 0);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_flash_survives_quiz_id_with_space() {
    let h = harness(false);

    let response = h.post("/quizzes/a%20b/questions/add", "value=short&answers=a&answers=b").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let target = location(&response).to_string();
    assert_eq!(target, "/quizzes/a%20b/questions/add");

    let (status, view) = h.get(&target).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["data"]["path"], "/quizzes/a%20b/questions/add");
    assert_eq!(view["data"]["errors"]["fields"]["value"][0], "validation.question.value.minLength");
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_flash_is_scoped_to_the_session() {
    let h = harness(false);
    h.post(ADD, "value=short&answers=a&answers=b").await;

    let other = Harness {
        router: h.router.clone(),
        store: h.store.clone(),
        questions: h.questions.clone(),
        session: uuid::Uuid::new_v4().to_string(),
    };
    let (_, view) = other.get(ADD).await;
    assert_eq!(view["data"]["errors"]["size"], 0);

    let (_, view) = h.get(ADD).await;
    assert_eq!(view["data"]["errors"]["fields"]["value"][0], "validation.question.value.minLength");
}

#[tokio::test]
async fn test_valid_submission_persists_without_flash() {
    let h = harness(false);

    let body = "value=Which+planet+is+largest%3F&answers[]=Jupiter&answers[]=Mars&answers[]=&correctAnswers[]=0";
    let response = h.post(ADD, body).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/quizzes/quiz-1/questions/add/success");
    assert!(h.store.is_empty());

    let calls = h.questions.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    let (op, id, record) = &calls[0];
    assert_eq!(op, "create");
    assert!(id.is_none());
    assert_eq!(record.quiz_id, "quiz-1");
    assert_eq!(record.answers, vec!["Jupiter", "Mars"]);
    assert_eq!(record.correct_answers, vec!["Jupiter"]);

    let (status, page) = h.get("/quizzes/quiz-1/questions/add/success").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"]["form"], ADD);
}

#[tokio::test]
async fn test_edit_updates_the_question() {
    let h = harness(false);

    let body = "value=Which+planet+is+largest%3F&answers=Jupiter&answers=Mars&correctAnswers=0&mediaId=planet-1&alternativeText=Jupiter";
    let response = h.post(EDIT, body).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/quizzes/quiz-1/questions/question-7/edit/success");

    let calls = h.questions.calls.lock().unwrap().clone();
    assert_eq!(calls[0].0, "update");
    assert_eq!(calls[0].1.as_deref(), Some("question-7"));
    assert_eq!(calls[0].2.media_id.as_deref(), Some("planet-1"));
}

#[tokio::test]
async fn test_edit_failure_returns_to_edit_form() {
    let h = harness(false);

    let body = "value=Which+planet+is+largest%3F&answers=Jupiter&answers=Mars&correctAnswers=0&mediaId=abc";
    let response = h.post(EDIT, body).await;
    assert_eq!(location(&response), EDIT);

    let (_, view) = h.get(EDIT).await;
    assert_eq!(view["data"]["group"], "edit");
    assert_eq!(view["data"]["errors"]["size"], 1);
    assert_eq!(view["data"]["errors"]["fields"]["alternativeText"][0], "validation.question.alternativeText.empty");

    // the add form of the same quiz has its own slot
    let (_, add) = h.get(ADD).await;
    assert_eq!(add["data"]["errors"]["size"], 0);
}

#[tokio::test]
async fn test_malformed_submission_is_bad_request() {
    let h = harness(false);

    let response = h.post(ADD, "value=no+answers+here").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(h.store.is_empty());

    let response = h.post(ADD, "value=q&answers=a&correctAnswers=5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let out: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(out["code"], "LMSA-COMM-INPT-0400");
}

#[tokio::test]
async fn test_remote_failure_is_bad_gateway() {
    let h = harness(true);

    let body = "value=Which+planet+is+largest%3F&answers=Jupiter&answers=Mars&correctAnswers=0";
    let response = h.post(ADD, body).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_new_visitor_gets_a_session_cookie() {
    let h = harness(false);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::SET_COOKIE].to_str().unwrap().starts_with("lms_admin_session="));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["data"]["name"], "lms-admin-test");
    assert_eq!(health["data"]["flash"], "memory");
    assert_eq!(health["data"]["questions"], "stub");
}
