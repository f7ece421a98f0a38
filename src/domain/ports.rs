use crate::domain::model::{PremiumQuote, QuoteRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// 外部保費計算服務
#[async_trait]
pub trait PremiumService: Send + Sync {
    async fn calculate_premium(&self, request: &QuoteRequest) -> Result<PremiumQuote>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
    fn extra_headers(&self) -> Option<&HashMap<String, String>> {
        None
    }
}
