use crate::web::validation::{ErrorReport, FieldErrors};

pub struct ErrorAggregator;

impl ErrorAggregator {
    /// Merge business fragments into the field errors.
    ///
    /// A fragment key already present keeps its field-rule messages first and
    /// gets the business messages appended; a new key becomes a new entry.
    /// The report size is recomputed from the merged map.
    pub fn merge(field_errors: FieldErrors, fragments: Vec<FieldErrors>) -> ErrorReport {
        let mut merged = field_errors;
        for fragment in fragments {
            merged.append(fragment);
        }
        ErrorReport::from(merged)
    }
}
