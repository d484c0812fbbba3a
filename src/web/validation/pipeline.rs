use crate::erx::ResultE;
use crate::web::validation::{BusinessRuleChecker, Candidate, ErrorAggregator, ErrorReport, FieldValidator, Group};
use tracing::debug;

/// field rules -> business rules -> aggregate
pub struct FormPipeline<C> {
    name: &'static str,
    fields: FieldValidator,
    business: BusinessRuleChecker<C>,
}

impl<C: Candidate> FormPipeline<C> {
    pub fn new(name: &'static str, fields: FieldValidator, business: BusinessRuleChecker<C>) -> Self {
        Self { name, fields, business }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs both validators and merges their output.
    /// Only a malformed candidate is an `Err`; validation failures live in the report.
    pub fn run(&self, candidate: &C, group: Group) -> ResultE<ErrorReport> {
        let field_errors = self.fields.check(candidate, group)?;
        debug!("[{}:{}] field rules: {} field(s) failed", self.name, group, field_errors.populated());

        let fragments = self.business.check(candidate);
        debug!("[{}:{}] business rules: {} fragment(s)", self.name, group, fragments.len());

        let report = ErrorAggregator::merge(field_errors, fragments);
        debug!("[{}:{}] aggregated size={}", self.name, group, report.size());

        Ok(report)
    }
}
