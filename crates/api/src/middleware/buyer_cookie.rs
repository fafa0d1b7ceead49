//! The anonymous `buyerId` cookie.
//!
//! [`BuyerCookie`] reads the raw value from the request. Handlers turn a
//! [`CookieDirective`] into a `Set-Cookie` header by returning a
//! [`BuyerCookieUpdate`] as part of their response.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponseParts, ResponseParts},
};
use cookie::time::{Duration, OffsetDateTime};
use cookie::{Cookie, SameSite};

use restore_core::CookieDirective;

/// Name of the anonymous buyer cookie.
pub const BUYER_COOKIE: &str = "buyerId";

/// Lifetime of the anonymous buyer cookie.
pub const BUYER_COOKIE_DAYS: i64 = 30;

/// Raw value of the `buyerId` cookie, if the request sent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyerCookie(pub Option<String>);

impl BuyerCookie {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BuyerCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(read_buyer_cookie(&parts.headers)))
    }
}

/// Find the `buyerId` value among all `Cookie` headers.
#[must_use]
pub fn read_buyer_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == BUYER_COOKIE)
        .map(|c| c.value().to_owned())
}

/// Response part applying a [`CookieDirective`] to the `buyerId` cookie.
#[derive(Debug, Clone)]
pub struct BuyerCookieUpdate {
    directive: CookieDirective,
    secure: bool,
}

impl BuyerCookieUpdate {
    /// `secure` adds the `Secure` attribute (set when served over HTTPS).
    #[must_use]
    pub const fn new(directive: CookieDirective, secure: bool) -> Self {
        Self { directive, secure }
    }

    /// The `Set-Cookie` header value, or `None` for `Keep`.
    #[must_use]
    pub fn header_value(&self) -> Option<HeaderValue> {
        let cookie = match &self.directive {
            CookieDirective::Keep => return None,
            CookieDirective::Set(buyer) => {
                Cookie::build((BUYER_COOKIE, buyer.to_string()))
                    .path("/")
                    .max_age(Duration::days(BUYER_COOKIE_DAYS))
                    .expires(OffsetDateTime::now_utc() + Duration::days(BUYER_COOKIE_DAYS))
                    .same_site(SameSite::Lax)
                    .http_only(true)
                    .secure(self.secure)
                    .build()
            }
            CookieDirective::Delete => {
                let mut cookie = Cookie::build((BUYER_COOKIE, ""))
                    .path("/")
                    .same_site(SameSite::Lax)
                    .http_only(true)
                    .secure(self.secure)
                    .build();
                cookie.make_removal();
                cookie
            }
        };

        HeaderValue::from_str(&cookie.to_string()).ok()
    }
}

impl IntoResponseParts for BuyerCookieUpdate {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(value) = self.header_value() {
            res.headers_mut().append(SET_COOKIE, value);
        }
        Ok(res)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use restore_core::BuyerId;

    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[test]
    fn test_read_cookie_among_others() {
        let map = headers(&["theme=dark; buyerId=abc-123", "lang=en"]);
        assert_eq!(read_buyer_cookie(&map).as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_read_cookie_in_second_header() {
        let map = headers(&["theme=dark", "buyerId=xyz"]);
        assert_eq!(read_buyer_cookie(&map).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(read_buyer_cookie(&headers(&["theme=dark"])), None);
        assert_eq!(read_buyer_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn test_keep_sends_nothing() {
        assert!(BuyerCookieUpdate::new(CookieDirective::Keep, false).header_value().is_none());
    }

    #[test]
    fn test_set_cookie_attributes() {
        let buyer = BuyerId::parse("3f1b6c1e").unwrap();
        let value = BuyerCookieUpdate::new(CookieDirective::Set(buyer), false)
            .header_value()
            .unwrap();
        let value = value.to_str().unwrap();

        assert!(value.starts_with("buyerId=3f1b6c1e"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("Max-Age=2592000"));
        assert!(value.contains("Expires="));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn test_secure_flag() {
        let buyer = BuyerId::parse("3f1b6c1e").unwrap();
        let value = BuyerCookieUpdate::new(CookieDirective::Set(buyer), true)
            .header_value()
            .unwrap();
        assert!(value.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn test_delete_expires_cookie() {
        let value = BuyerCookieUpdate::new(CookieDirective::Delete, false)
            .header_value()
            .unwrap();
        let value = value.to_str().unwrap();
        assert!(value.starts_with("buyerId="));
        assert!(value.contains("Max-Age=0"));
        assert!(value.contains("Path=/"));
    }
}
