/// Layouted: predefined layouted code shortcuts
/// ResultE<T> = Result<T, Erx>;
/// ResultEX = ResultE<()>;
/// fn smp<T: ToString>(error: T) -> Erx
/// fn amp<T: ToString>(additional: &str) -> impl Fn(T) -> Erx
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Application part of every layouted code
pub static APP_SHORT: &str = "LMSA";

/// Zero
pub static LAYOUTED_C_ZERO: &str = "0000";

/// ResultE<T> = Result<T, Erx>;
pub type ResultE<T> = Result<T, Erx>;

/// ResultEX = ResultE<()>;
pub type ResultEX = ResultE<()>;

/// Layouted: Some predefined Layouted methods
pub struct Layouted;

/// smp: simple convert T: ToString to Erx
pub fn smp<T: ToString>(error: T) -> Erx {
    Erx { code: Default::default(), message: error.to_string(), extra: Vec::new() }
}

/// amp: return a function that convert T: ToString to Erx, prefixing the message
///
/// # Example
/// ```
/// let to_erx = lms_admin::erx::amp("session store");
/// let erx = to_erx("connection refused");
/// assert_eq!(erx.message(), "session store : connection refused");
/// ```
pub fn amp<T: ToString>(additional: &str) -> impl Fn(T) -> Erx {
    let additional = additional.to_string();
    move |err: T| Erx { code: Default::default(), message: format!("{} : {}", additional, err.to_string()), extra: Vec::new() }
}

/// Predefined Layouted Code with length 4
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreL4 {
    /// Common
    COMM,
    /// Middleware
    MIDL,
    /// Service (downstream collaborators)
    SERV,
    /// Undefined
    UNDF,
    /// Submitted input could not be shaped into a candidate
    INPT,
    /// Remote collaborator failure
    REMO,
    /// Session / flash store
    SESS,
    /// Configuration
    CONF,
}

impl PreL4 {
    pub fn four(&self) -> &'static str {
        match self {
            PreL4::COMM => "COMM",
            PreL4::MIDL => "MIDL",
            PreL4::SERV => "SERV",
            PreL4::UNDF => "UNDF",
            PreL4::INPT => "INPT",
            PreL4::REMO => "REMO",
            PreL4::SESS => "SESS",
            PreL4::CONF => "CONF",
        }
    }
}

impl From<PreL4> for String {
    fn from(value: PreL4) -> Self {
        value.four().to_string()
    }
}

impl Layouted {
    /// common: 通用错误
    pub fn common(category: &str, detail: &str) -> LayoutedC {
        LayoutedC::new(PreL4::COMM.four(), category, detail)
    }

    /// middleware: 中间件错误
    pub fn middleware(category: &str, detail: &str) -> LayoutedC {
        LayoutedC::new(PreL4::MIDL.four(), category, detail)
    }

    /// service: 服务错误
    pub fn service(category: &str, detail: &str) -> LayoutedC {
        LayoutedC::new(PreL4::SERV.four(), category, detail)
    }
}

/// Code format
/// aaaa-xxxx-yyyy-zzzz
///
///    aaaa : application short name
///    xxxx : domain, four letters
///    yyyy : category inside the domain
///    zzzz : concrete error
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LayoutedC {
    pub application: String,
    pub domain: String,
    pub category: String,
    pub detail: String,
}

impl LayoutedC {
    pub fn okay() -> LayoutedC {
        LayoutedC {
            application: APP_SHORT.into(),
            domain: LAYOUTED_C_ZERO.into(),
            category: LAYOUTED_C_ZERO.into(),
            detail: LAYOUTED_C_ZERO.into(),
        }
    }

    pub fn new(domain: &str, category: &str, detail: &str) -> LayoutedC {
        LayoutedC { application: APP_SHORT.into(), domain: domain.into(), category: category.into(), detail: detail.into() }
    }

    pub fn layout_string(&self) -> String {
        format!("{}-{}-{}-{}", self.application, self.domain, self.category, self.detail)
    }

    pub fn get_category(&self) -> &str {
        &self.category
    }

    pub fn get_detail(&self) -> &str {
        &self.detail
    }
}

impl Default for LayoutedC {
    fn default() -> Self {
        LayoutedC { application: APP_SHORT.into(), domain: PreL4::UNDF.into(), category: PreL4::UNDF.into(), detail: PreL4::UNDF.into() }
    }
}

impl From<LayoutedC> for String {
    fn from(value: LayoutedC) -> Self {
        value.layout_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Erx {
    code: LayoutedC,
    message: String,
    extra: Vec<(String, String)>,
}

impl Erx {
    pub fn new(message: &str) -> Erx {
        Erx { code: Default::default(), message: message.to_string(), extra: Vec::new() }
    }

    pub fn with_code(code: LayoutedC, message: &str) -> Erx {
        Erx { code, message: message.to_string(), extra: Vec::new() }
    }

    /// Submitted input that can not be shaped into a candidate record.
    /// Resubmitting the same shape never helps, so it maps to a 400.
    pub fn malformed(message: &str) -> Erx {
        Erx::with_code(Layouted::common(PreL4::INPT.four(), "0400"), message)
    }

    /// A downstream collaborator failed after validation passed.
    pub fn remote(message: &str) -> Erx {
        Erx::with_code(Layouted::service(PreL4::REMO.four(), "0502"), message)
    }

    pub fn is_malformed(&self) -> bool {
        self.code.category == PreL4::INPT.four()
    }

    pub fn is_remote(&self) -> bool {
        self.code.category == PreL4::REMO.four()
    }

    pub fn code(&self) -> LayoutedC {
        self.code.clone()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn message_string(&self) -> String {
        self.message.clone()
    }

    /// code, message and every extra pair on one line, for logs
    pub fn description(&self) -> String {
        let mut description = self.code.layout_string();
        description.push(' ');
        description.push_str(&self.message);
        if self.extra.is_empty() {
            return description;
        }

        let pairs: Vec<String> = self.extra.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        description.push_str(" { ");
        description.push_str(&pairs.join(", "));
        description.push_str(" }");

        description
    }

    /// add extra
    /// if key exists, replace value
    pub fn add_extra(&mut self, key: &str, value: &str) -> &mut Self {
        for (k, v) in self.extra.iter_mut() {
            if *k == key {
                *v = value.to_string();
                return self;
            }
        }

        self.extra.push((key.to_string(), value.to_string()));
        self
    }
}

impl Display for Erx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Erx {}
