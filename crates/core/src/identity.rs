//! Buyer identity resolution.
//!
//! Each request resolves, once, which [`BuyerId`] it acts for. An
//! authenticated user name always wins over the anonymous `buyerId` cookie.
//! Anonymous ids are minted only when a basket actually has to be created,
//! never just because a request arrived without one.

use crate::types::BuyerId;

/// What the response should do with the `buyerId` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CookieDirective {
    /// Leave the cookie alone.
    #[default]
    Keep,
    /// Issue (or re-issue) the cookie with this value.
    Set(BuyerId),
    /// Expire a stale or empty cookie.
    Delete,
}

impl CookieDirective {
    /// Combine with a later directive. A later `Set` or `Delete` replaces
    /// whatever was decided earlier; a later `Keep` changes nothing.
    #[must_use]
    pub fn then(self, later: Self) -> Self {
        match later {
            Self::Keep => self,
            other => other,
        }
    }
}

/// Result of resolving the buyer for a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub buyer: Option<BuyerId>,
    pub cookie: CookieDirective,
}

impl Resolution {
    const fn found(buyer: BuyerId) -> Self {
        Self {
            buyer: Some(buyer),
            cookie: CookieDirective::Keep,
        }
    }

    const fn missing() -> Self {
        Self {
            buyer: None,
            cookie: CookieDirective::Delete,
        }
    }
}

/// Resolve the buyer from an optional authenticated name and cookie value.
///
/// A blank principal counts as absent. A cookie only counts when it holds
/// an anonymous id; anything else (blank, or a value such as a user name) is
/// treated as stale. When neither yields an identity the resolution asks for
/// the cookie to be deleted.
#[must_use]
pub fn resolve_buyer(principal: Option<&str>, cookie: Option<&str>) -> Resolution {
    if let Some(buyer) = principal.and_then(|name| BuyerId::parse(name).ok()) {
        return Resolution::found(buyer);
    }
    resolve_anonymous(cookie)
}

/// Resolve the buyer from the anonymous cookie only (used at login).
#[must_use]
pub fn resolve_anonymous(cookie: Option<&str>) -> Resolution {
    cookie
        .and_then(|value| BuyerId::parse_anonymous(value).ok())
        .map_or_else(Resolution::missing, Resolution::found)
}

/// Identity for a basket that is about to be created.
///
/// Uses the authenticated name when there is one; otherwise mints an
/// anonymous id and asks for it to be stored in the cookie.
#[must_use]
pub fn identity_for_new_basket(principal: Option<&str>) -> (BuyerId, CookieDirective) {
    match principal.and_then(|name| BuyerId::parse(name).ok()) {
        Some(buyer) => (buyer, CookieDirective::Keep),
        None => {
            let buyer = BuyerId::anonymous();
            (buyer.clone(), CookieDirective::Set(buyer))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(value: &str) -> BuyerId {
        BuyerId::parse(value).unwrap()
    }

    const GUEST: &str = "3f1b6c1e-0000-4000-8000-00000000abcd";

    #[test]
    fn test_authenticated_name_wins_over_cookie() {
        let r = resolve_buyer(Some("bob"), Some(GUEST));
        assert_eq!(r.buyer, Some(id("bob")));
        assert_eq!(r.cookie, CookieDirective::Keep);
    }

    #[test]
    fn test_cookie_used_when_anonymous() {
        let r = resolve_buyer(None, Some(GUEST));
        assert_eq!(r.buyer, Some(id(GUEST)));
        assert_eq!(r.cookie, CookieDirective::Keep);
    }

    #[test]
    fn test_blank_principal_falls_back_to_cookie() {
        let r = resolve_buyer(Some(""), Some(GUEST));
        assert_eq!(r.buyer, Some(id(GUEST)));
    }

    #[test]
    fn test_no_identity_deletes_cookie() {
        for cookie in [None, Some(""), Some("  ")] {
            let r = resolve_buyer(None, cookie);
            assert_eq!(r.buyer, None);
            assert_eq!(r.cookie, CookieDirective::Delete);
        }
    }

    #[test]
    fn test_cookie_naming_a_user_is_not_an_identity() {
        for cookie in ["alice", "bob", "3f1b6c1e-guest"] {
            let r = resolve_buyer(None, Some(cookie));
            assert_eq!(r.buyer, None, "{cookie}");
            assert_eq!(r.cookie, CookieDirective::Delete, "{cookie}");

            let r = resolve_anonymous(Some(cookie));
            assert_eq!(r.buyer, None, "{cookie}");
            assert_eq!(r.cookie, CookieDirective::Delete, "{cookie}");
        }
    }

    #[test]
    fn test_resolve_anonymous_ignores_principal_flow() {
        assert_eq!(resolve_anonymous(Some(GUEST)).buyer, Some(id(GUEST)));
        assert_eq!(resolve_anonymous(None).cookie, CookieDirective::Delete);
    }

    #[test]
    fn test_new_basket_identity_for_user_keeps_cookie() {
        let (buyer, cookie) = identity_for_new_basket(Some("bob"));
        assert_eq!(buyer, id("bob"));
        assert_eq!(cookie, CookieDirective::Keep);
    }

    #[test]
    fn test_new_basket_identity_for_guest_sets_cookie() {
        let (buyer, cookie) = identity_for_new_basket(None);
        assert_eq!(cookie, CookieDirective::Set(buyer));
    }

    #[test]
    fn test_set_supersedes_earlier_delete() {
        let fresh = id("fresh");
        let combined = CookieDirective::Delete.then(CookieDirective::Set(fresh.clone()));
        assert_eq!(combined, CookieDirective::Set(fresh));
        assert_eq!(CookieDirective::Delete.then(CookieDirective::Keep), CookieDirective::Delete);
    }
}
