use crate::domain::model::{CityTier, QuoteRequest, SumInsured, Tenure};
use crate::utils::error::{FieldError, QuoteError, Result};
use crate::utils::validation::validate_required_field;
use std::num::IntErrorKind;

/// 唯一在本地檢查的年齡上限
pub const MAX_AGE: u32 = 65;

pub const AGES_REQUIRED: &str = "Please enter ages!";
pub const SUM_INSURED_REQUIRED: &str = "Please select sum insured!";
pub const CITY_TIER_REQUIRED: &str = "Please select city tier!";
pub const TENURE_REQUIRED: &str = "Please select tenure!";

/// 使用者輸入的原始表單內容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteForm {
    pub ages: Option<String>,
    pub sum_insured: Option<String>,
    pub city_tier: Option<String>,
    pub tenure: Option<String>,
}

impl QuoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ages(mut self, ages: impl Into<String>) -> Self {
        self.ages = Some(ages.into());
        self
    }

    pub fn with_sum_insured(mut self, sum_insured: impl Into<String>) -> Self {
        self.sum_insured = Some(sum_insured.into());
        self
    }

    pub fn with_city_tier(mut self, city_tier: impl Into<String>) -> Self {
        self.city_tier = Some(city_tier.into());
        self
    }

    pub fn with_tenure(mut self, tenure: impl Into<String>) -> Self {
        self.tenure = Some(tenure.into());
        self
    }

    /// Checks required fields, parses selections and ages, and enforces the age limit.
    ///
    /// Missing fields are all reported together. Only then are values parsed, so a
    /// form with both a blank field and a bad age reports the blank field.
    pub fn validate(&self) -> Result<QuoteRequest> {
        let ages = validate_required_field("ages", &self.ages, AGES_REQUIRED);
        let sum_insured =
            validate_required_field("sum_insured", &self.sum_insured, SUM_INSURED_REQUIRED);
        let city_tier = validate_required_field("city_tier", &self.city_tier, CITY_TIER_REQUIRED);
        let tenure = validate_required_field("tenure", &self.tenure, TENURE_REQUIRED);

        let (ages, sum_insured, city_tier, tenure) = match (ages, sum_insured, city_tier, tenure)
        {
            (Ok(a), Ok(s), Ok(c), Ok(t)) => (a, s, c, t),
            (a, s, c, t) => {
                let errors: Vec<FieldError> = [a.err(), s.err(), c.err(), t.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                return Err(QuoteError::ValidationError { errors });
            }
        };

        let sum_insured: SumInsured = sum_insured.parse()?;
        let city_tier: CityTier = city_tier.parse()?;
        let tenure: Tenure = tenure.parse()?;

        let age_list = parse_ages(ages)?;
        check_age_limit(&age_list)?;

        Ok(QuoteRequest {
            age_list,
            sum_insured,
            city_tier,
            tenure,
        })
    }
}

/// 以逗號切分年齡字串；每個片段去除空白後必須是非負整數
pub fn parse_ages(input: &str) -> Result<Vec<u32>> {
    input
        .split(',')
        .map(str::trim)
        .map(|token| {
            token.parse::<u32>().map_err(|e| match e.kind() {
                // 數字本身合法但大到放不進 u32，一定超過上限
                IntErrorKind::PosOverflow => QuoteError::AgeOutOfRangeError {
                    age: token.to_string(),
                },
                _ => QuoteError::AgeParseError {
                    token: token.to_string(),
                },
            })
        })
        .collect()
}

/// 下限 18 只出現在訊息中，這裡不檢查
pub fn check_age_limit(ages: &[u32]) -> Result<()> {
    match ages.iter().copied().find(|age| *age > MAX_AGE) {
        Some(age) => Err(QuoteError::AgeOutOfRangeError {
            age: age.to_string(),
        }),
        None => Ok(()),
    }
}
