//! Browser-held session: three HTTP-only cookies.
//!
//! Tokens are stored as plain cookie values. This keeps the server stateless
//! but is only acceptable for local demos; anyone with the browser profile can
//! read them.

use {
    axum_extra::extract::cookie::{Cookie, CookieJar, SameSite},
    forcelink_oauth::TokenSet,
};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
pub const INSTANCE_COOKIE: &str = "instance";

/// Session cookies present on a request. Empty values count as absent.
#[derive(Default)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub instance_url: Option<String>,
}

impl SessionTokens {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let read = |name: &str| {
            jar.get(name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            access_token: read(ACCESS_TOKEN_COOKIE),
            refresh_token: read(REFRESH_TOKEN_COOKIE),
            instance_url: read(INSTANCE_COOKIE),
        }
    }

    /// Both tokens present, i.e. a previous callback already completed.
    pub fn is_established(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }
}

/// Attributes applied to every session cookie.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    fn cookie(&self, name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    pub fn store_tokens(&self, jar: CookieJar, tokens: &TokenSet) -> CookieJar {
        jar.add(self.cookie(REFRESH_TOKEN_COOKIE, tokens.refresh_token.clone()))
            .add(self.cookie(INSTANCE_COOKIE, tokens.instance_url.clone()))
            .add(self.cookie(ACCESS_TOKEN_COOKIE, tokens.access_token.clone()))
    }

    pub fn store_access_token(&self, jar: CookieJar, access_token: String) -> CookieJar {
        jar.add(self.cookie(ACCESS_TOKEN_COOKIE, access_token))
    }

    /// Expire both tokens. The instance cookie is left in place.
    pub fn clear_tokens(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"))
            .remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

    use super::*;

    fn jar(cookies: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookies).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_reads_session_cookies() {
        let tokens = SessionTokens::from_jar(&jar(
            "access_token=at; refresh_token=rt; instance=https://na1.salesforce.com",
        ));
        assert_eq!(tokens.access_token.as_deref(), Some("at"));
        assert_eq!(tokens.refresh_token.as_deref(), Some("rt"));
        assert_eq!(
            tokens.instance_url.as_deref(),
            Some("https://na1.salesforce.com")
        );
        assert!(tokens.is_established());
    }

    #[test]
    fn test_empty_values_are_absent() {
        let tokens = SessionTokens::from_jar(&jar("access_token=; refresh_token=rt"));
        assert_eq!(tokens.access_token, None);
        assert!(!tokens.is_established());
    }

    #[test]
    fn test_stored_cookies_are_http_only() {
        let policy = CookiePolicy { secure: true };
        let jar = policy.store_tokens(CookieJar::new(), &TokenSet {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            instance_url: "https://na1.salesforce.com".into(),
        });

        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, INSTANCE_COOKIE] {
            let cookie = jar.get(name).unwrap();
            assert_eq!(cookie.http_only(), Some(true), "{name}");
            assert_eq!(cookie.secure(), Some(true), "{name}");
            assert_eq!(cookie.path(), Some("/"), "{name}");
        }
        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().value(), "at");
    }

    #[test]
    fn test_clear_tokens_keeps_instance() {
        let jar = CookiePolicy::default()
            .clear_tokens(jar("access_token=at; refresh_token=rt; instance=https://x"));
        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
        assert!(jar.get(REFRESH_TOKEN_COOKIE).is_none());
        assert!(jar.get(INSTANCE_COOKIE).is_some());
    }
}
