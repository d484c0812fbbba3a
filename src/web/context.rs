/// Per-request context, inserted as an `Extension` by the session middleware.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Context {
    session: String,
    /// the session id was issued by this request
    fresh: bool,
}

impl Context {
    pub fn new(session: &str, fresh: bool) -> Self {
        Self { session: session.to_string(), fresh }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// a fresh session has never been redirected, so it has nothing flashed
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }
}
