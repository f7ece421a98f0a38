use clap::Parser;
use premium_cart::utils::error::ErrorSeverity;
use premium_cart::utils::logger::{self, LogFormat};
use premium_cart::utils::validation::Validate;
use premium_cart::{CliConfig, HttpPremiumService, QuoteError, QuoteSession, Shell};
use std::io::IsTerminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, LogFormat::from_flag(cli.log_json));

    tracing::info!("Starting premium-cart");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    let service = match HttpPremiumService::from_config(&config) {
        Ok(service) => service,
        Err(e) => exit_with(e),
    };
    tracing::info!("🌐 Premium service: {}", service.endpoint());

    let interactive = !cli.script && std::io::stdin().is_terminal();
    let shell = Shell::new(QuoteSession::new(service), config.prompt.clone());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    shell.run(stdin, &mut stdout, interactive).await?;

    tracing::info!("Session ended");
    Ok(())
}

/// 啟動失敗時依錯誤嚴重程度決定退出碼
fn exit_with(e: QuoteError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
