///  fn load(path, run_mode) -> ResultE<Conf>
///  fn load_env() -> ResultE<Conf>
///
///  struct Conf
///
/// The loaded `Conf` is handed to each component constructor; nothing below
/// reads configuration from ambient state after startup.
use crate::erx::{self, Erx, Layouted, PreL4, ResultE};
use config::Config;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Environment variable prefix, e.g. `LMSA_WEB__PORT=8080`
pub static ENV_PREFIX: &str = "LMSA";

/// Admin config
/// # Fields
/// * `name` - application name, also used for the log file name
/// * `debug` - debug mode
/// * `web` - web listener config
/// * `log` - log config
/// * `session` - session cookie and flash store config
/// * `services` - downstream REST services
/// * `rules` - question form validation limits
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct Conf {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    #[validate(nested)]
    pub session: Session,
    #[serde(default)]
    pub services: Services,
    #[serde(default)]
    #[validate(nested)]
    pub rules: Rules,
}

/// Log config
/// # Fields
/// * `level` - tracing EnvFilter directives
/// * `console` - write to stdout
/// * `dirs` - daily rolling file directory, empty disables file logging
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Log {
    pub level: String,
    pub console: bool,
    pub dirs: String,
}

/// Web config
/// # Fields
/// * `port` - web port
/// * `bind` - bind address, `0.0.0.0` when absent
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Web {
    pub port: u16,
    pub bind: Option<String>,
}

/// FlashBackend
/// # Fields
/// * `Memory` - in process store, sessions die with the process
/// * `Redis` - redis backed store
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashBackend {
    Memory,
    Redis,
}

/// Session config
/// # Fields
/// * `cookie` - session cookie name
/// * `ttl_secs` - session lifetime, unread flash expires with it
/// * `backend` - flash store backend
/// * `redis` - redis connect string, required for the redis backend
/// * `prefix` - key prefix inside the flash store
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct Session {
    #[validate(length(min = 1))]
    pub cookie: String,
    #[validate(range(min = 1))]
    pub ttl_secs: u64,
    pub backend: FlashBackend,
    pub redis: Option<String>,
    pub prefix: String,
}

/// Downstream services
/// # Fields
/// * `quiz` - base url of the quiz/question service
/// * `user_agent` - optional user agent for outgoing requests
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Services {
    pub quiz: String,
    pub user_agent: Option<String>,
}

/// Question form limits
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[validate(schema(function = "validate_rule_bounds"))]
pub struct Rules {
    #[validate(range(min = 1))]
    pub value_min_length: u64,
    pub value_max_length: u64,
    #[validate(range(min = 1))]
    pub explanation_max_length: u64,
    #[validate(range(min = 1))]
    pub suggestions_max_length: u64,
    pub max_blank_answers: usize,
    #[validate(range(min = 1))]
    pub min_answers: u64,
}

fn validate_rule_bounds(rules: &Rules) -> Result<(), validator::ValidationError> {
    if rules.value_min_length > rules.value_max_length {
        return Err(validator::ValidationError::new("value_min_length_exceeds_max"));
    }
    Ok(())
}

fn default_name() -> String {
    "lms-admin".to_string()
}

impl Default for Log {
    fn default() -> Self {
        Log { level: "info".to_string(), console: true, dirs: String::new() }
    }
}

impl Default for Web {
    fn default() -> Self {
        Self { bind: None, port: 8080 }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session {
            cookie: "lms_admin_session".to_string(),
            ttl_secs: 60 * 60 * 2,
            backend: FlashBackend::Memory,
            redis: None,
            prefix: "lmsa:flash".to_string(),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Services { quiz: "http://127.0.0.1:9001".to_string(), user_agent: None }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            value_min_length: 10,
            value_max_length: 1500,
            explanation_max_length: 4000,
            suggestions_max_length: 4000,
            max_blank_answers: 3,
            min_answers: 2,
        }
    }
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            name: default_name(),
            debug: false,
            web: Default::default(),
            log: Default::default(),
            session: Default::default(),
            services: Default::default(),
            rules: Default::default(),
        }
    }
}

impl FromStr for FlashBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(FlashBackend::Memory),
            "redis" => Ok(FlashBackend::Redis),
            _ => Err(format!("unknown flash backend: {}", s)),
        }
    }
}

impl fmt::Display for FlashBackend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FlashBackend::Memory => write!(f, "memory"),
            FlashBackend::Redis => write!(f, "redis"),
        }
    }
}

impl Web {
    pub fn bind_addr(&self) -> String {
        let bind = self.bind.clone().unwrap_or("0.0.0.0".to_string());
        format!("{}:{}", bind, self.port)
    }
}

impl Conf {
    /// check limits and backend requirements
    /// # Returns
    /// * `ResultE<()>` - CONF coded error listing every offending field
    pub fn check(&self) -> ResultE<()> {
        if let Err(errs) = self.validate() {
            let fields: Vec<String> = errs.errors().keys().map(|k| k.to_string()).collect();
            let mut erx = Erx::with_code(
                Layouted::common(PreL4::CONF.four(), "0001"),
                &format!("invalid configuration: {}", fields.join(", ")),
            );
            erx.add_extra("detail", &errs.to_string());
            return Err(erx);
        }

        if self.session.backend == FlashBackend::Redis && self.session.redis.is_none() {
            return Err(Erx::with_code(
                Layouted::common(PreL4::CONF.four(), "0002"),
                "session.redis is required when session.backend is redis",
            ));
        }

        Ok(())
    }
}

/// load config from `{path}/config.yml`, `{path}/{run_mode}.yml`, `{path}/local.yml`
/// and `LMSA_*` environment variables, later sources win
/// # Arguments
/// * `path` - config directory
/// * `run_mode` - development | production | testing
/// # Returns
/// * `ResultE<Conf>` - checked config
pub fn load(path: &str, run_mode: &str) -> ResultE<Conf> {
    tracing::info!("{}_RUN_MODE={} config path: {}", ENV_PREFIX, run_mode, path);

    let conf = config::File::with_name(&format!("{path}/config.yml")).required(false);
    let mode = config::File::with_name(&format!("{path}/{run_mode}.yml")).required(false);
    let local = config::File::with_name(&format!("{path}/local.yml")).required(false);

    let builder = Config::builder()
        .add_source(conf)
        .add_source(mode)
        .add_source(local)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    from_config(builder.build().map_err(erx::amp("config build"))?)
}

/// load using `LMSA_CONFIG_PATH` (default `config`) and `LMSA_RUN_MODE` (default `development`)
pub fn load_env() -> ResultE<Conf> {
    let run_mode = std::env::var(format!("{ENV_PREFIX}_RUN_MODE")).unwrap_or("development".to_string());
    let config_path = std::env::var(format!("{ENV_PREFIX}_CONFIG_PATH")).unwrap_or("config".to_string());
    load(&config_path, &run_mode)
}

/// load a single file, used by tests and tools
pub fn load_file(file: &str) -> ResultE<Conf> {
    let c = Config::builder()
        .add_source(config::File::with_name(file).required(true))
        .build()
        .map_err(erx::amp("config build"))?;
    from_config(c)
}

fn from_config(c: Config) -> ResultE<Conf> {
    let conf = c.try_deserialize::<Conf>().map_err(erx::amp("config deserialize"))?;
    conf.check()?;
    Ok(conf)
}
