use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日誌輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// RUST_LOG 未設定時使用的過濾規則
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "premium_cart=debug,info"
    } else {
        "premium_cart=info"
    }
}

/// Installs the global subscriber. Output goes to stderr so it never interleaves
/// with shell output. Returns `false` when a subscriber was already installed.
pub fn init_logger(verbose: bool, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Json => registry.with(layer.json()).try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_flag() {
        assert_eq!(LogFormat::from_flag(true), LogFormat::Json);
        assert_eq!(LogFormat::from_flag(false), LogFormat::Compact);
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }

    #[test]
    fn test_verbose_enables_crate_debug() {
        assert_eq!(default_directive(true), "premium_cart=debug,info");
        assert_eq!(default_directive(false), "premium_cart=info");
    }

    #[test]
    fn test_second_init_is_ignored() {
        init_logger(false, LogFormat::Compact);
        assert!(!init_logger(true, LogFormat::Json));
    }
}
