use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateLength;

pub struct Obj;
pub struct Len;
pub struct Enc;

static SLUG: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").ok());

impl Obj {
    /// blank after trimming
    pub fn empty(s: &str) -> bool {
        s.trim().is_empty()
    }

    pub fn count_empty<S: AsRef<str>>(items: &[S]) -> usize {
        items.iter().filter(|s| Obj::empty(s.as_ref())).count()
    }
}

/// Lengths count characters, not bytes.
impl Len {
    pub fn min(s: &str, min: u64) -> bool {
        s.validate_length(Some(min), None, None)
    }

    pub fn max(s: &str, max: u64) -> bool {
        s.validate_length(None, Some(max), None)
    }

    pub fn items_min<T>(items: &[T], min: u64) -> bool {
        items.len() as u64 >= min
    }

    pub fn items_max<T>(items: &[T], max: u64) -> bool {
        items.len() as u64 <= max
    }
}

impl Enc {
    /// letters, digits, `-` and `_`, e.g. media identifiers
    pub fn slug(s: &str) -> bool {
        match SLUG.as_ref() {
            Some(re) => re.is_match(s),
            None => false,
        }
    }
}
