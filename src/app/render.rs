use crate::core::cart::Cart;
use crate::domain::model::Plan;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// 短暫顯示給使用者的訊息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.level {
            NoticeLevel::Success => "✅",
            NoticeLevel::Info => "ℹ️ ",
            NoticeLevel::Warning => "⚠️ ",
            NoticeLevel::Error => "❌",
        };
        write!(f, "{} {}", icon, self.message)
    }
}

/// 報價時間的顯示格式
pub const QUOTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub fn render_premium(premium: Option<f64>) -> Option<String> {
    premium.map(|p| format!("Premium: $ {}", p))
}

pub fn render_plan(index: usize, plan: &Plan) -> String {
    let ages = plan
        .age_list
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    [
        format!("[{}] Ages: {}", index, ages),
        format!("    Sum Insured: ${}", plan.sum_insured),
        format!("    City Tier: {}", plan.city_tier),
        format!("    Tenure: {} year(s)", plan.tenure),
        format!("    Premium: ${}", plan.premium),
        format!("    Quoted At: {}", plan.quoted_at.format(QUOTED_AT_FORMAT)),
    ]
    .join("\n")
}

/// 購物車清單；非空時附上應付總額
pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart\n  (empty)".to_string();
    }

    let mut lines = vec!["Cart".to_string()];
    lines.extend(
        cart.items()
            .iter()
            .enumerate()
            .map(|(index, plan)| render_plan(index, plan)),
    );
    lines.push(format!("Total Amount Payable: $ {}", cart.total()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CityTier, PremiumQuote, QuoteRequest, SumInsured, Tenure};
    use chrono::{TimeZone, Utc};

    fn plan(premium: f64) -> Plan {
        Plan::from_quote(
            QuoteRequest {
                age_list: vec![25, 35, 40],
                sum_insured: SumInsured::FiveLakh,
                city_tier: CityTier::Tier1,
                tenure: Tenure::TwoYears,
            },
            PremiumQuote {
                total_premium: premium,
            },
        )
    }

    #[test]
    fn test_render_premium() {
        assert_eq!(render_premium(None), None);
        assert_eq!(render_premium(Some(1200.0)).unwrap(), "Premium: $ 1200");
        assert_eq!(render_premium(Some(99.5)).unwrap(), "Premium: $ 99.5");
    }

    #[test]
    fn test_render_plan_lines() {
        let text = render_plan(0, &plan(1200.0));
        assert!(text.contains("[0] Ages: 25, 35, 40"));
        assert!(text.contains("Sum Insured: $500000"));
        assert!(text.contains("City Tier: tier-1"));
        assert!(text.contains("Tenure: 2 year(s)"));
        assert!(text.contains("Premium: $1200"));
    }

    #[test]
    fn test_render_plan_shows_quote_time() {
        let mut quoted = plan(1200.0);
        quoted.quoted_at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 5, 0).unwrap();

        let text = render_plan(2, &quoted);
        assert!(text.ends_with("    Quoted At: 2026-03-14 09:05:00 UTC"));
    }

    #[test]
    fn test_render_cart_with_total() {
        let mut cart = Cart::new();
        assert!(render_cart(&cart).contains("(empty)"));
        assert!(!render_cart(&cart).contains("Total Amount Payable"));

        cart.append(plan(1200.0));
        cart.append(plan(800.0));
        let text = render_cart(&cart);
        assert!(text.contains("[1] Ages"));
        assert!(text.ends_with("Total Amount Payable: $ 2000"));
    }

    #[test]
    fn test_notification_display() {
        assert_eq!(Notification::error("boom").to_string(), "❌ boom");
        assert_eq!(Notification::success("ok").to_string(), "✅ ok");
    }
}
