use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw submitted form: field name -> every submitted value, in submission order.
///
/// `answers[]=a&answers[]=b` and `answers=a&answers=b` land on the same key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedForm(IndexMap<String, Vec<String>>);

fn normalize_key(key: &str) -> &str {
    key.strip_suffix("[]").unwrap_or(key)
}

impl SubmittedForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// parse an `application/x-www-form-urlencoded` body
    pub fn parse(body: &str) -> Self {
        url::form_urlencoded::parse(body.as_bytes()).into_owned().collect()
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.0.entry(normalize_key(key).to_string()).or_default().push(value.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(normalize_key(key))
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.get(normalize_key(key)).and_then(|v| v.first()).map(|s| s.as_str())
    }

    /// first value, or empty when the field was not submitted
    pub fn text(&self, key: &str) -> String {
        self.first(key).unwrap_or_default().to_string()
    }

    pub fn all(&self, key: &str) -> Option<&[String]> {
        self.0.get(normalize_key(key)).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for SubmittedForm {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut form = SubmittedForm::new();
        for (key, value) in iter {
            form.push(&key, value);
        }
        form
    }
}

impl From<Vec<(String, String)>> for SubmittedForm {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}
