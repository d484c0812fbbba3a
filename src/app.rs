use crate::conf::Conf;
use crate::erx::ResultE;
use crate::question::{question_pipeline, QuestionCandidate};
use crate::service::{HttpQuestionService, QuestionService};
use crate::web::flash::{make_store, FlashRedirector, FlashStore};
use crate::web::validation::FormPipeline;
use std::sync::Arc;
use tracing::info;

/// Everything a request handler needs, built once from `Conf`.
pub struct Admin {
    conf: Conf,
    pipeline: FormPipeline<QuestionCandidate>,
    flash_store: &'static str,
    flash: FlashRedirector,
    questions: Arc<dyn QuestionService>,
}

impl Admin {
    pub fn conf(&self) -> &Conf {
        &self.conf
    }

    pub fn pipeline(&self) -> &FormPipeline<QuestionCandidate> {
        &self.pipeline
    }

    pub fn flash(&self) -> &FlashRedirector {
        &self.flash
    }

    pub fn flash_store_name(&self) -> &'static str {
        self.flash_store
    }

    pub fn questions(&self) -> &Arc<dyn QuestionService> {
        &self.questions
    }
}

/// Wires `Admin` from configuration. The flash store and the question service
/// default to the configured backends and can be swapped, e.g. in tests.
pub struct AppBuilder {
    conf: Conf,
    store: Option<Arc<dyn FlashStore>>,
    questions: Option<Arc<dyn QuestionService>>,
}

impl AppBuilder {
    pub fn new(conf: Conf) -> Self {
        AppBuilder { conf, store: None, questions: None }
    }

    pub fn use_flash_store(&mut self, store: Arc<dyn FlashStore>) -> &mut Self {
        self.store = Some(store);
        self
    }

    pub fn use_question_service(&mut self, questions: Arc<dyn QuestionService>) -> &mut Self {
        self.questions = Some(questions);
        self
    }

    pub fn build(self) -> ResultE<Arc<Admin>> {
        self.conf.check()?;

        let store = match self.store {
            Some(store) => store,
            None => make_store(&self.conf.session)?,
        };
        let questions: Arc<dyn QuestionService> = match self.questions {
            Some(questions) => questions,
            None => Arc::new(HttpQuestionService::from_conf(&self.conf.services)?),
        };

        info!("[{}] flash store: {}, question service: {}", self.conf.name, store.name(), questions.name());

        Ok(Arc::new(Admin {
            pipeline: question_pipeline(&self.conf.rules),
            flash_store: store.name(),
            flash: FlashRedirector::new(store),
            questions,
            conf: self.conf,
        }))
    }
}
