use axum::http::{header, HeaderMap};
use std::collections::HashMap;

/// 简单的 Cookie 解析器
pub struct CookieJar {
    cookies: HashMap<String, String>,
}

impl CookieJar {
    /// 从请求头创建 CookieJar, every `Cookie` header is read
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut cookies = HashMap::new();

        for cookie_header in headers.get_all(header::COOKIE) {
            let Ok(cookie_str) = cookie_header.to_str() else {
                continue;
            };
            for cookie in cookie_str.split(';') {
                if let Some((key, value)) = cookie.trim().split_once('=') {
                    cookies.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }

        Self { cookies }
    }

    /// 获取指定名称的 cookie 值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(|v| v.as_str())
    }
}

/// `Set-Cookie` value for the session cookie
pub fn session_cookie(name: &str, value: &str, max_age_secs: u64) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}", name, value, max_age_secs)
}
