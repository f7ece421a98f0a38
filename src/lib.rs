pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use app::shell::Shell;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpPremiumService;
pub use config::AppConfig;
pub use crate::core::{cart::Cart, form::QuoteForm, session::QuoteSession};
pub use utils::error::{QuoteError, Result};
