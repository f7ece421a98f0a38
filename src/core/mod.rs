pub mod cart;
pub mod form;
pub mod session;

pub use crate::domain::model::{CityTier, Plan, PremiumQuote, QuoteRequest, SumInsured, Tenure};
pub use crate::domain::ports::{ConfigProvider, PremiumService};
pub use crate::utils::error::Result;
