use crate::domain::model::Plan;
use crate::utils::error::{QuoteError, Result};

/// 結帳時產生的確認內容；結帳不會改動購物車
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckoutSummary {
    pub item_count: usize,
    pub total: f64,
}

impl CheckoutSummary {
    pub fn confirmation(&self) -> String {
        format!("Checkout: Total Amount Payable: ${}", self.total)
    }
}

/// Ordered, in-memory list of accepted plans. Positions are zero-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<Plan>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, plan: Plan) {
        self.items.push(plan);
    }

    /// 超出範圍時回傳錯誤，序列保持不變
    pub fn remove_at(&mut self, index: usize) -> Result<Plan> {
        if index >= self.items.len() {
            return Err(QuoteError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|plan| plan.premium).sum()
    }

    pub fn checkout(&self) -> CheckoutSummary {
        CheckoutSummary {
            item_count: self.items.len(),
            total: self.total(),
        }
    }

    pub fn items(&self) -> &[Plan] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Plan> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CityTier, PremiumQuote, QuoteRequest, SumInsured, Tenure};

    fn plan(premium: f64, ages: Vec<u32>) -> Plan {
        let request = QuoteRequest {
            age_list: ages,
            sum_insured: SumInsured::ThreeLakh,
            city_tier: CityTier::Tier2,
            tenure: Tenure::TwoYears,
        };
        Plan::from_quote(request, PremiumQuote { total_premium: premium })
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_total_sums_premiums() {
        let mut cart = Cart::new();
        cart.append(plan(1200.0, vec![30]));
        cart.append(plan(800.0, vec![40]));
        assert_eq!(cart.total(), 2000.0);
    }

    #[test]
    fn test_append_keeps_duplicates_in_order() {
        let mut cart = Cart::new();
        cart.append(plan(500.0, vec![30]));
        cart.append(plan(500.0, vec![30]));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_remove_first_shifts_second_to_front() {
        let mut cart = Cart::new();
        cart.append(plan(1200.0, vec![25]));
        cart.append(plan(800.0, vec![50]));

        let removed = cart.remove_at(0).unwrap();

        assert_eq!(removed.premium, 1200.0);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(0).unwrap().premium, 800.0);
        assert_eq!(cart.get(0).unwrap().age_list, vec![50]);
    }

    #[test]
    fn test_remove_out_of_range_leaves_cart_intact() {
        let mut cart = Cart::new();
        cart.append(plan(1200.0, vec![25]));

        let err = cart.remove_at(1).unwrap_err();
        assert!(matches!(err, QuoteError::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), 1200.0);
    }

    #[test]
    fn test_checkout_is_read_only_and_repeatable() {
        let mut cart = Cart::new();
        cart.append(plan(1200.0, vec![25]));
        cart.append(plan(800.0, vec![50]));
        let before = cart.clone();

        let first = cart.checkout();
        let second = cart.checkout();

        assert_eq!(first, second);
        assert_eq!(first.item_count, 2);
        assert!(first.confirmation().contains("2000"));
        assert_eq!(cart, before);
    }
}
