//! Basket reconciliation at login.
//!
//! When a shopper signs in, the basket they filled anonymously wins over
//! whatever basket their account already had. [`plan_merge`] decides what
//! happens; the basket repository applies the plan in one transaction.

use crate::basket::Basket;
use crate::types::{BasketId, BuyerId};

/// Outcome of reconciling a user's basket with an anonymous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Basket the user ends up with (returned in the login response).
    pub basket: Option<Basket>,
    /// Previously owned user basket to delete.
    pub discard: Option<BasketId>,
    /// Whether `basket` was re-keyed from an anonymous buyer id.
    pub rekeyed: bool,
}

impl MergePlan {
    /// Whether applying the plan writes anything.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.rekeyed || self.discard.is_some()
    }
}

/// Decide how to reconcile `user_basket` and `anonymous` for `user_name`.
///
/// - No anonymous basket: the user's basket (possibly none) is kept as is.
/// - Anonymous basket present: it is re-keyed to `user_name`, and the
///   user's previous basket, if any, is discarded.
///
/// If both arguments are the same stored basket (the cookie already held the
/// user name), nothing is discarded.
#[must_use]
pub fn plan_merge(
    user_basket: Option<Basket>,
    anonymous: Option<Basket>,
    user_name: &BuyerId,
) -> MergePlan {
    let Some(mut anonymous) = anonymous else {
        return MergePlan {
            basket: user_basket,
            discard: None,
            rekeyed: false,
        };
    };

    let discard = user_basket
        .and_then(|b| b.id)
        .filter(|id| Some(*id) != anonymous.id);
    let rekeyed = anonymous.buyer_id != *user_name;
    anonymous.buyer_id = user_name.clone();

    MergePlan {
        basket: Some(anonymous),
        discard,
        rekeyed,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;

    fn stored(id: i32, buyer: &str, product_id: i32, quantity: u32) -> Basket {
        let mut basket = Basket::new(BuyerId::parse(buyer).unwrap());
        basket.id = Some(BasketId::new(id));
        basket.add_item(&product(product_id, "P", 100, "B", "T"), quantity);
        basket
    }

    fn bob() -> BuyerId {
        BuyerId::parse("bob").unwrap()
    }

    #[test]
    fn test_no_baskets_at_all() {
        let plan = plan_merge(None, None, &bob());
        assert_eq!(plan.basket, None);
        assert!(!plan.has_changes());
    }

    #[test]
    fn test_no_anonymous_basket_keeps_user_basket() {
        let user = stored(1, "bob", 5, 2);
        let plan = plan_merge(Some(user.clone()), None, &bob());
        assert_eq!(plan.basket, Some(user));
        assert_eq!(plan.discard, None);
        assert!(!plan.rekeyed);
    }

    #[test]
    fn test_anonymous_basket_replaces_user_basket() {
        let user = stored(1, "bob", 5, 2);
        let anon = stored(2, "8a1c7e0e-0000-4000-8000-000000000000", 7, 3);
        let plan = plan_merge(Some(user), Some(anon), &bob());

        let kept = plan.basket.as_ref().unwrap();
        assert_eq!(kept.id, Some(BasketId::new(2)));
        assert_eq!(kept.buyer_id, bob());
        assert_eq!(kept.items.len(), 1);
        assert_eq!(kept.items[0].quantity, 3);
        assert_eq!(plan.discard, Some(BasketId::new(1)));
        assert!(plan.rekeyed);
    }

    #[test]
    fn test_anonymous_basket_without_user_basket_is_rekeyed() {
        let anon = stored(2, "guest-token", 7, 1);
        let plan = plan_merge(None, Some(anon), &bob());
        assert_eq!(plan.basket.unwrap().buyer_id, bob());
        assert_eq!(plan.discard, None);
        assert!(plan.rekeyed);
    }

    #[test]
    fn test_cookie_pointing_at_user_basket_is_not_discarded() {
        let user = stored(1, "bob", 5, 2);
        let plan = plan_merge(Some(user.clone()), Some(user.clone()), &bob());
        assert_eq!(plan.basket, Some(user));
        assert!(!plan.has_changes());
    }
}
