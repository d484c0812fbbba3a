use crate::app::Admin;
use crate::web::api::Out;
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod question;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Health {
    pub name: String,
    pub version: String,
    pub flash: String,
    pub questions: String,
}

pub async fn health(State(admin): State<Arc<Admin>>) -> Out<Health> {
    Out::ok(Health {
        name: admin.conf().name.clone(),
        version: crate::VERSION.to_string(),
        flash: admin.flash_store_name().to_string(),
        questions: admin.questions().name().to_string(),
    })
}

pub fn all_actions() -> Router<Arc<Admin>> {
    Router::new().route("/health", get(health)).merge(question::question_actions())
}
