use crate::web::validation::FieldErrors;
use std::fmt;

type Violation<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// A cross-field rule: when `violated` holds, `message` is attached to `field`.
pub struct BusinessRule<C> {
    field: String,
    message: String,
    violated: Violation<C>,
}

impl<C> fmt::Debug for BusinessRule<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BusinessRule").field("field", &self.field).field("message", &self.message).finish()
    }
}

/// Runs every business rule, never short-circuits, so all simultaneous
/// violations come back in one pass.
#[derive(Debug)]
pub struct BusinessRuleChecker<C> {
    rules: Vec<BusinessRule<C>>,
}

impl<C> Default for BusinessRuleChecker<C> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<C> BusinessRuleChecker<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule<F>(mut self, field: &str, message: &str, violated: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.rules.push(BusinessRule { field: field.to_string(), message: message.to_string(), violated: Box::new(violated) });
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// one single-key fragment per violated rule, in declaration order
    pub fn check(&self, candidate: &C) -> Vec<FieldErrors> {
        self.rules
            .iter()
            .filter(|rule| (rule.violated)(candidate))
            .map(|rule| FieldErrors::single(rule.field.as_str(), rule.message.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: i32,
        right: i32,
    }

    fn checker() -> BusinessRuleChecker<Pair> {
        BusinessRuleChecker::new()
            .rule("left", "left.negative", |p: &Pair| p.left < 0)
            .rule("right", "right.less_than_left", |p: &Pair| p.right < p.left)
            .rule("left", "left.zero_sum", |p: &Pair| p.left + p.right == 0)
    }

    #[test]
    fn test_reports_every_violation() {
        let fragments = checker().check(&Pair { left: -1, right: -2 });
        assert_eq!(fragments.len(), 2);
        assert!(fragments.iter().all(|f| f.populated() == 1));
        assert_eq!(fragments[0].get("left").unwrap(), ["left.negative"]);
        assert_eq!(fragments[1].get("right").unwrap(), ["right.less_than_left"]);
    }

    #[test]
    fn test_no_violation_no_fragment() {
        assert!(checker().check(&Pair { left: 1, right: 2 }).is_empty());
        assert_eq!(checker().len(), 3);
    }
}
