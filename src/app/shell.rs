use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::render::{render_cart, render_premium, Notification};
use crate::core::form::QuoteForm;
use crate::core::session::QuoteSession;
use crate::domain::model::{CityTier, SumInsured, Tenure};
use crate::domain::ports::PremiumService;
use crate::utils::error::{QuoteError, Result};

#[derive(Debug, Parser)]
#[command(name = "premium-cart", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Calculate a premium and add the plan to the cart
    #[command(alias = "calculate")]
    Quote {
        /// Comma-separated ages, e.g. 25,35,40
        #[arg(long)]
        ages: Option<String>,
        /// 300000 / 400000 / 500000
        #[arg(long)]
        sum_insured: Option<String>,
        /// tier-1 / tier-2
        #[arg(long)]
        city_tier: Option<String>,
        /// 1 / 2 (years)
        #[arg(long)]
        tenure: Option<String>,
    },
    /// Show the plans in the cart
    Cart,
    /// Remove the plan at a cart position
    Remove { index: usize },
    /// Show the total amount payable
    Checkout,
    /// Show the last calculated premium
    Premium,
    /// List the accepted values for each form field
    Options,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub control: LoopControl,
    pub lines: Vec<String>,
}

impl ShellOutput {
    fn lines(lines: Vec<String>) -> Self {
        Self {
            control: LoopControl::Continue,
            lines,
        }
    }

    fn notice(notification: Notification) -> Self {
        Self::lines(vec![notification.to_string()])
    }

    fn exit() -> Self {
        Self {
            control: LoopControl::Exit,
            lines: Vec::new(),
        }
    }
}

/// 把錯誤轉成使用者看得到的通知；欄位錯誤逐欄列出
pub fn notifications_for(error: &QuoteError) -> Vec<Notification> {
    match error {
        QuoteError::ValidationError { errors } => errors
            .iter()
            .map(|e| Notification::error(e.message.clone()))
            .collect(),
        QuoteError::SubmissionInFlight => {
            vec![Notification::warning(error.user_friendly_message())]
        }
        other => vec![Notification::error(other.user_friendly_message())],
    }
}

/// Line-oriented front end over a [`QuoteSession`].
pub struct Shell<S: PremiumService> {
    session: QuoteSession<S>,
    prompt: String,
}

impl<S: PremiumService> Shell<S> {
    pub fn new(session: QuoteSession<S>, prompt: impl Into<String>) -> Self {
        Self {
            session,
            prompt: prompt.into(),
        }
    }

    pub fn session(&self) -> &QuoteSession<S> {
        &self.session
    }

    /// 讀取輸入直到 EOF 或 exit；互動模式下會顯示提示字元
    pub async fn run<R, W>(&self, reader: R, out: &mut W, interactive: bool) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = reader.lines();

        if interactive {
            writeln!(out, "Insurance Premium Calculator")?;
            writeln!(out, "Type `help` for commands, `exit` to leave.")?;
        }

        loop {
            if interactive {
                write!(out, "{}", self.prompt)?;
                out.flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                tracing::debug!("Input closed, leaving shell");
                break;
            };

            let output = self.handle_line(&line).await;
            for text in &output.lines {
                writeln!(out, "{}", text)?;
            }
            if output.control == LoopControl::Exit {
                break;
            }
        }

        Ok(())
    }

    pub async fn handle_line(&self, line: &str) -> ShellOutput {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return ShellOutput::lines(Vec::new());
        }

        let tokens = match shell_words::split(trimmed) {
            Ok(tokens) => tokens,
            Err(e) => {
                return ShellOutput::notice(Notification::warning(format!(
                    "Could not parse command: {}",
                    e
                )))
            }
        };

        let command = match ShellLine::try_parse_from(tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => return ShellOutput::lines(vec![e.render().to_string().trim_end().to_string()]),
        };

        tracing::debug!("Dispatching shell command: {:?}", command);
        self.dispatch(command).await
    }

    async fn dispatch(&self, command: ShellCommand) -> ShellOutput {
        match command {
            ShellCommand::Quote {
                ages,
                sum_insured,
                city_tier,
                tenure,
            } => {
                let form = QuoteForm {
                    ages,
                    sum_insured,
                    city_tier,
                    tenure,
                };
                self.calculate(&form).await
            }
            ShellCommand::Cart => {
                let snapshot = self.session.snapshot().await;
                ShellOutput::lines(vec![render_cart(&snapshot.cart)])
            }
            ShellCommand::Remove { index } => match self.session.remove_at(index).await {
                Ok(plan) => ShellOutput::notice(Notification::success(format!(
                    "Removed plan [{}] (premium ${})",
                    index, plan.premium
                ))),
                Err(e) => ShellOutput::lines(to_lines(notifications_for(&e))),
            },
            ShellCommand::Checkout => {
                let summary = self.session.checkout().await;
                if summary.item_count == 0 {
                    ShellOutput::notice(Notification::info("Your cart is empty."))
                } else {
                    ShellOutput::notice(Notification::success(summary.confirmation()))
                }
            }
            ShellCommand::Premium => match render_premium(self.session.premium().await) {
                Some(text) => ShellOutput::lines(vec![text]),
                None => ShellOutput::notice(Notification::info("No premium calculated yet.")),
            },
            ShellCommand::Options => ShellOutput::lines(options_help()),
            ShellCommand::Exit => ShellOutput::exit(),
        }
    }

    async fn calculate(&self, form: &QuoteForm) -> ShellOutput {
        match self.session.submit(form).await {
            Ok(plan) => {
                let position = self.session.snapshot().await.cart.len().saturating_sub(1);
                let mut lines: Vec<String> = render_premium(Some(plan.premium)).into_iter().collect();
                lines.push(
                    Notification::success(format!("Plan added to cart at position {}", position))
                        .to_string(),
                );
                ShellOutput::lines(lines)
            }
            Err(e) => ShellOutput::lines(to_lines(notifications_for(&e))),
        }
    }
}

fn to_lines(notifications: Vec<Notification>) -> Vec<String> {
    notifications.iter().map(|n| n.to_string()).collect()
}

fn options_help() -> Vec<String> {
    let sum_insured = SumInsured::ALL
        .iter()
        .map(|s| format!("{} ({})", s, s.label()))
        .collect::<Vec<_>>()
        .join(", ");
    let city_tier = CityTier::ALL
        .iter()
        .map(|t| format!("{} ({})", t, t.label()))
        .collect::<Vec<_>>()
        .join(", ");
    let tenure = Tenure::ALL
        .iter()
        .map(|t| format!("{} ({})", t, t.label()))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        "Ages: comma-separated, e.g. 25,35,40".to_string(),
        format!("Sum Insured: {}", sum_insured),
        format!("City Tier: {}", city_tier),
        format!("Tenure: {}", tenure),
    ]
}
