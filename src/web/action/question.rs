//! Add and edit question forms.
//!
//! GET renders the form view, consuming any flashed errors for this session.
//! POST runs the question pipeline: failures are flashed and redirected back
//! to the form, a clean submission is persisted and redirected to `/success`.
use crate::app::Admin;
use crate::question::{QuestionCandidate, QuestionRecord};
use crate::web::api::Out;
use crate::web::context::Context;
use crate::web::except::Except;
use crate::web::input::SubmittedForm;
use crate::web::tools::{found, success_path};
use crate::web::url::encode_segment;
use crate::web::validation::{ErrorReport, Group};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Form, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub fn add_form_path(quiz: &str) -> String {
    format!("/quizzes/{}/questions/add", encode_segment(quiz))
}

pub fn edit_form_path(quiz: &str, id: &str) -> String {
    format!("/quizzes/{}/questions/{}/edit", encode_segment(quiz), encode_segment(id))
}

/// What the form page renders: previous errors and the values to refill.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FormView {
    pub path: String,
    pub group: Option<Group>,
    pub errors: ErrorReport,
    pub form: SubmittedForm,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SuccessView {
    pub form: String,
    pub message: String,
}

async fn form_view(admin: &Admin, ctx: &Context, path: String, group: Group) -> Result<Out<FormView>, Except> {
    let flashed = if ctx.is_fresh() { None } else { admin.flash().consume(ctx.session(), &path).await? };
    let (errors, form) = flashed.map(|p| (p.report, p.form)).unwrap_or_default();
    Ok(Out::ok(FormView { path, group: Some(group), errors, form }))
}

async fn submit(
    admin: &Admin, ctx: &Context, form: SubmittedForm, path: String, quiz: &str, id: Option<&str>, group: Group,
) -> Result<Response, Except> {
    let candidate = QuestionCandidate::from_form(&form, quiz, id)?;
    let report = admin.pipeline().run(&candidate, group)?;

    if !report.is_valid() {
        return Ok(admin.flash().redirect_with_errors(ctx.session(), report, form, &path).await?);
    }

    let record = QuestionRecord::from(candidate);
    let saved = match id {
        Some(id) => admin.questions().update(id, &record).await?,
        None => admin.questions().create(&record).await?,
    };

    info!("[{}] question {} saved in quiz {}", group, saved, record.quiz_id);
    Ok(found(&success_path(&path)))
}

pub async fn add_form(
    State(admin): State<Arc<Admin>>, Extension(ctx): Extension<Context>, Path(quiz): Path<String>,
) -> Result<Out<FormView>, Except> {
    form_view(&admin, &ctx, add_form_path(&quiz), Group::Add).await
}

pub async fn add(
    State(admin): State<Arc<Admin>>, Extension(ctx): Extension<Context>, Path(quiz): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, Except> {
    submit(&admin, &ctx, fields.into(), add_form_path(&quiz), &quiz, None, Group::Add).await
}

pub async fn add_success(Path(quiz): Path<String>) -> Out<SuccessView> {
    Out::ok(SuccessView { form: add_form_path(&quiz), message: "question created".to_string() })
}

pub async fn edit_form(
    State(admin): State<Arc<Admin>>, Extension(ctx): Extension<Context>, Path((quiz, id)): Path<(String, String)>,
) -> Result<Out<FormView>, Except> {
    form_view(&admin, &ctx, edit_form_path(&quiz, &id), Group::Edit).await
}

pub async fn edit(
    State(admin): State<Arc<Admin>>, Extension(ctx): Extension<Context>, Path((quiz, id)): Path<(String, String)>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, Except> {
    submit(&admin, &ctx, fields.into(), edit_form_path(&quiz, &id), &quiz, Some(id.as_str()), Group::Edit).await
}

pub async fn edit_success(Path((quiz, id)): Path<(String, String)>) -> Out<SuccessView> {
    Out::ok(SuccessView { form: edit_form_path(&quiz, &id), message: "question updated".to_string() })
}

pub fn question_actions() -> Router<Arc<Admin>> {
    Router::new()
        .route("/quizzes/{quiz}/questions/add", get(add_form).post(add))
        .route("/quizzes/{quiz}/questions/add/success", get(add_success))
        .route("/quizzes/{quiz}/questions/{id}/edit", get(edit_form).post(edit))
        .route("/quizzes/{quiz}/questions/{id}/edit/success", get(edit_success))
}
