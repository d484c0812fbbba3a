use crate::erx::{Erx, ResultE};
use crate::web::url::join as url_join;
use reqwest::Response;
use std::time::Duration;

/// Builder for clients talking to the platform's REST services.
pub struct ClientBuilder {
    base: String,
    headers: reqwest::header::HeaderMap,
    user_agent: Option<String>,
    timeout: Duration,
}

/// JSON client bound to one service base url. Every failure, transport or
/// non-2xx status, comes back as a remote `Erx`; nothing is retried here.
#[derive(Clone)]
pub struct Client {
    base: String,
    cli: reqwest::Client,
}

static DEFAULT_USER_AGENT: &str = "lms-admin/0.1";

impl ClientBuilder {
    pub fn new(base: &str) -> ClientBuilder {
        ClientBuilder {
            base: base.to_string(),
            headers: reqwest::header::HeaderMap::new(),
            user_agent: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn set_user_agent(&mut self, agent: &str) -> &mut Self {
        self.user_agent = Some(agent.to_string());
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn use_json(&mut self) -> &mut Self {
        let val = reqwest::header::HeaderValue::from_static("application/json");
        self.headers.insert(reqwest::header::ACCEPT, val.clone());
        self.headers.insert(reqwest::header::CONTENT_TYPE, val);
        self
    }

    pub fn build(&self) -> ResultE<Client> {
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let cli = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(self.headers.clone())
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Erx::new(&format!("http client build failed: {}", e)))?;

        Ok(Client { base: self.base.clone(), cli })
    }
}

impl Client {
    fn remote_error<T: ToString>(error: T) -> Erx {
        Erx::remote(&error.to_string())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn post_typed<ResponseT, RequestT>(&self, path: &str, params: &RequestT) -> ResultE<ResponseT>
    where
        ResponseT: serde::de::DeserializeOwned,
        RequestT: serde::Serialize + ?Sized,
    {
        let url = url_join(&self.base, path);
        let response = self.cli.post(url).json(params).send().await.map_err(Self::remote_error)?;
        Self::_response_typed(response).await
    }

    pub async fn put_typed<ResponseT, RequestT>(&self, path: &str, params: &RequestT) -> ResultE<ResponseT>
    where
        ResponseT: serde::de::DeserializeOwned,
        RequestT: serde::Serialize + ?Sized,
    {
        let url = url_join(&self.base, path);
        let response = self.cli.put(url).json(params).send().await.map_err(Self::remote_error)?;
        Self::_response_typed(response).await
    }

    async fn _response_typed<T>(response: Response) -> ResultE<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        let url = response.url().to_string();
        if status.is_success() {
            return response.json::<T>().await.map_err(Self::remote_error);
        }

        let body = response.text().await.unwrap_or_default();
        let mut erx = Erx::remote(&format!("{} responded {}", url, status));
        erx.add_extra("status", status.as_str()).add_extra("body", &body);
        Err(erx)
    }
}
