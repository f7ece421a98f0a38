use crate::core::cart::{Cart, CheckoutSummary};
use crate::core::form::QuoteForm;
use crate::domain::model::Plan;
use crate::domain::ports::PremiumService;
use crate::utils::error::{QuoteError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// 單一 session 的可變狀態：最近一次保費與購物車
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub premium: Option<f64>,
    pub cart: Cart,
}

/// Quote form controller. Owns the last computed premium and the cart, and only
/// changes them after the premium service answers successfully.
pub struct QuoteSession<S: PremiumService> {
    service: S,
    state: Mutex<SessionSnapshot>,
    in_flight: AtomicBool,
}

/// 請求結束（成功、失敗或被取消）時釋放 in-flight 旗標
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| QuoteError::SubmissionInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl<S: PremiumService> QuoteSession<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: Mutex::new(SessionSnapshot::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Validates the form, asks the service for a premium and appends the new plan.
    ///
    /// Validation failures never reach the network. Any service failure leaves the
    /// displayed premium and the cart exactly as they were.
    pub async fn submit(&self, form: &QuoteForm) -> Result<Plan> {
        let request = form.validate().inspect_err(|e| {
            tracing::debug!("Quote form rejected: {}", e);
        })?;

        let _guard = InFlightGuard::acquire(&self.in_flight).inspect_err(|_| {
            tracing::warn!("Submission ignored: a premium calculation is already running");
        })?;

        tracing::info!(
            "Requesting premium for {} insured, sum insured {}, {}, {} year(s)",
            request.age_list.len(),
            request.sum_insured,
            request.city_tier,
            request.tenure
        );

        let quote = match self.service.calculate_premium(&request).await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::error!(
                    "❌ Premium calculation failed: {} (Category: {:?})",
                    e,
                    e.category()
                );
                return Err(e);
            }
        };

        let plan = Plan::from_quote(request, quote);

        let mut state = self.state.lock().await;
        state.premium = Some(plan.premium);
        state.cart.append(plan.clone());
        tracing::info!(
            "✅ Premium {} added to cart ({} item(s))",
            plan.premium,
            state.cart.len()
        );

        Ok(plan)
    }

    pub async fn remove_at(&self, index: usize) -> Result<Plan> {
        let mut state = self.state.lock().await;
        let removed = state.cart.remove_at(index)?;
        tracing::debug!("Removed cart item {} ({} left)", index, state.cart.len());
        Ok(removed)
    }

    pub async fn checkout(&self) -> CheckoutSummary {
        let summary = self.state.lock().await.cart.checkout();
        tracing::info!(
            "Checkout requested: {} item(s), total {}",
            summary.item_count,
            summary.total
        );
        summary
    }

    pub async fn premium(&self) -> Option<f64> {
        self.state.lock().await.premium
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PremiumQuote, QuoteRequest};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    /// 依序回傳預設結果的假服務，並記錄呼叫次數
    struct ScriptedService {
        responses: std::sync::Mutex<Vec<Result<PremiumQuote>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedService {
        fn new(responses: Vec<Result<PremiumQuote>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let mut responses = responses;
            responses.reverse();
            (
                Self {
                    responses: std::sync::Mutex::new(responses),
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl PremiumService for ScriptedService {
        async fn calculate_premium(&self, _request: &QuoteRequest) -> Result<PremiumQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(QuoteError::StatusError { status: 500 }))
        }
    }

    fn form(ages: &str) -> QuoteForm {
        QuoteForm::new()
            .with_ages(ages)
            .with_sum_insured("500000")
            .with_city_tier("tier-1")
            .with_tenure("1")
    }

    #[tokio::test]
    async fn test_successful_submit_updates_premium_and_cart() {
        let (service, calls) = ScriptedService::new(vec![Ok(PremiumQuote { total_premium: 1200.0 })]);
        let session = QuoteSession::new(service);

        let plan = session.submit(&form("25,35,40")).await.unwrap();

        assert_eq!(plan.premium, 1200.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.premium, Some(1200.0));
        assert_eq!(snapshot.cart.len(), 1);
        assert_eq!(snapshot.cart.get(0).unwrap().age_list, vec![25, 35, 40]);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_service() {
        let (service, calls) = ScriptedService::new(vec![]);
        let session = QuoteSession::new(service);

        assert!(session.submit(&QuoteForm::new()).await.is_err());
        assert!(matches!(
            session.submit(&form("30,70")).await,
            Err(QuoteError::AgeOutOfRangeError { ref age }) if age == "70"
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_state() {
        let (service, _calls) = ScriptedService::new(vec![
            Ok(PremiumQuote { total_premium: 900.0 }),
            Err(QuoteError::StatusError { status: 502 }),
        ]);
        let session = QuoteSession::new(service);

        session.submit(&form("30")).await.unwrap();
        let before = session.snapshot().await;

        let err = session.submit(&form("45")).await.unwrap_err();

        assert!(matches!(err, QuoteError::StatusError { status: 502 }));
        assert_eq!(session.snapshot().await, before);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_remove_and_checkout_through_session() {
        let (service, _calls) = ScriptedService::new(vec![
            Ok(PremiumQuote { total_premium: 1200.0 }),
            Ok(PremiumQuote { total_premium: 800.0 }),
        ]);
        let session = QuoteSession::new(service);
        session.submit(&form("25")).await.unwrap();
        session.submit(&form("55")).await.unwrap();

        let summary = session.checkout().await;
        assert_eq!(summary.total, 2000.0);
        assert_eq!(session.snapshot().await.cart.len(), 2);

        session.remove_at(0).await.unwrap();
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.cart.len(), 1);
        assert_eq!(snapshot.cart.get(0).unwrap().premium, 800.0);
        // 移除項目不影響最近一次顯示的保費
        assert_eq!(snapshot.premium, Some(800.0));

        assert!(session.remove_at(3).await.is_err());
    }

    #[test]
    fn test_in_flight_guard_rejects_second_holder() {
        let flag = AtomicBool::new(false);
        let first = InFlightGuard::acquire(&flag).unwrap();
        assert!(matches!(
            InFlightGuard::acquire(&flag),
            Err(QuoteError::SubmissionInFlight)
        ));
        drop(first);
        assert!(InFlightGuard::acquire(&flag).is_ok());
    }
}
