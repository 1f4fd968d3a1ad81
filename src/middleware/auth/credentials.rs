//! Pull raw credentials off a request. No verification happens here.
use axum::http::{HeaderMap, Uri, header};

use crate::services::auth::Credentials;
use crate::services::auth::token_guard::API_TOKEN_FIELD;

pub fn extract(headers: &HeaderMap, uri: &Uri, session_cookie: &str) -> Credentials {
    Credentials {
        bearer_token: bearer_token(headers),
        query_api_token: query_param(uri, API_TOKEN_FIELD),
        session_id: cookie(headers, session_cookie),
    }
}

/// `Authorization: Bearer <token>`, scheme matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"').to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn reads_all_three_sources() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer tok-1"),
            (header::COOKIE, "theme=dark; session_id=abc123"),
        ]);
        let uri: Uri = "/api/v1/me?page=2&api_token=tok%202".parse().unwrap();

        let c = extract(&h, &uri, "session_id");
        assert_eq!(c.bearer_token.as_deref(), Some("tok-1"));
        assert_eq!(c.query_api_token.as_deref(), Some("tok 2"));
        assert_eq!(c.session_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn nothing_present() {
        let c = extract(&HeaderMap::new(), &Uri::from_static("/api/v1/me"), "session_id");
        assert!(c.bearer_token.is_none());
        assert!(c.query_api_token.is_none());
        assert!(c.session_id.is_none());
    }

    #[test]
    fn bearer_scheme_is_case_insensitive_and_others_ignored() {
        let lower = headers(&[(header::AUTHORIZATION, "bearer tok-1")]);
        assert_eq!(bearer_token(&lower).as_deref(), Some("tok-1"));

        let basic = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwdw==")]);
        assert!(bearer_token(&basic).is_none());

        let empty = headers(&[(header::AUTHORIZATION, "Bearer ")]);
        assert!(bearer_token(&empty).is_none());
    }

    #[test]
    fn cookie_is_found_across_headers_by_exact_name() {
        let h = headers(&[
            (header::COOKIE, "my_session_id=wrong"),
            (header::COOKIE, "sid=\"quoted\""),
        ]);

        assert_eq!(cookie(&h, "sid").as_deref(), Some("quoted"));
        assert!(cookie(&h, "session_id").is_none());
    }
}
