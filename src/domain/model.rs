use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::QuoteError;

/// 保額選項
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum SumInsured {
    ThreeLakh,
    FourLakh,
    FiveLakh,
}

impl SumInsured {
    pub const ALL: [SumInsured; 3] = [Self::ThreeLakh, Self::FourLakh, Self::FiveLakh];

    pub fn amount(self) -> u32 {
        match self {
            Self::ThreeLakh => 300_000,
            Self::FourLakh => 400_000,
            Self::FiveLakh => 500_000,
        }
    }

    /// 選單上顯示的標籤，例如 "300,000"
    pub fn label(self) -> &'static str {
        match self {
            Self::ThreeLakh => "300,000",
            Self::FourLakh => "400,000",
            Self::FiveLakh => "500,000",
        }
    }
}

impl From<SumInsured> for u32 {
    fn from(value: SumInsured) -> Self {
        value.amount()
    }
}

impl TryFrom<u32> for SumInsured {
    type Error = QuoteError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.amount() == value)
            .ok_or_else(|| invalid_choice("sum insured", value.to_string(), &Self::ALL))
    }
}

impl FromStr for SumInsured {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().replace(',', "");
        cleaned
            .parse::<u32>()
            .map_err(|_| invalid_choice("sum insured", s.trim().to_string(), &Self::ALL))
            .and_then(Self::try_from)
            .map_err(|_| invalid_choice("sum insured", s.trim().to_string(), &Self::ALL))
    }
}

impl fmt::Display for SumInsured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityTier {
    #[serde(rename = "tier-1")]
    Tier1,
    #[serde(rename = "tier-2")]
    Tier2,
}

impl CityTier {
    pub const ALL: [CityTier; 2] = [Self::Tier1, Self::Tier2];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tier1 => "tier-1",
            Self::Tier2 => "tier-2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1",
            Self::Tier2 => "Tier 2",
        }
    }
}

impl FromStr for CityTier {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value) || t.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| invalid_choice("city tier", value.to_string(), &Self::ALL))
    }
}

impl fmt::Display for CityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 保單年期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tenure {
    OneYear,
    TwoYears,
}

impl Tenure {
    pub const ALL: [Tenure; 2] = [Self::OneYear, Self::TwoYears];

    pub fn years(self) -> u8 {
        match self {
            Self::OneYear => 1,
            Self::TwoYears => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OneYear => "1 year",
            Self::TwoYears => "2 years",
        }
    }
}

impl From<Tenure> for u8 {
    fn from(value: Tenure) -> Self {
        value.years()
    }
}

impl TryFrom<u8> for Tenure {
    type Error = QuoteError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|t| t.years() == value)
            .ok_or_else(|| invalid_choice("tenure", value.to_string(), &Self::ALL))
    }
}

impl FromStr for Tenure {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if let Some(tenure) = Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(value))
        {
            return Ok(tenure);
        }
        value
            .parse::<u8>()
            .map_err(|_| invalid_choice("tenure", value.to_string(), &Self::ALL))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.years())
    }
}

fn invalid_choice<T: fmt::Display>(field: &str, value: String, options: &[T]) -> QuoteError {
    QuoteError::InvalidChoiceError {
        field: field.to_string(),
        value,
        allowed: options
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(" / "),
    }
}

/// 送往保費服務的請求內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub age_list: Vec<u32>,
    pub sum_insured: SumInsured,
    pub city_tier: CityTier,
    pub tenure: Tenure,
}

/// 保費服務回應，只取用 `total_premium`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PremiumQuote {
    pub total_premium: f64,
}

/// 購物車中的一筆方案，建立後不再修改
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub age_list: Vec<u32>,
    pub sum_insured: SumInsured,
    pub city_tier: CityTier,
    pub tenure: Tenure,
    pub premium: f64,
    pub quoted_at: DateTime<Utc>,
}

impl Plan {
    pub fn from_quote(request: QuoteRequest, quote: PremiumQuote) -> Self {
        Self {
            age_list: request.age_list,
            sum_insured: request.sum_insured,
            city_tier: request.city_tier,
            tenure: request.tenure,
            premium: quote.total_premium,
            quoted_at: Utc::now(),
        }
    }
}
