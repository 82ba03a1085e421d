//! Channel-independent alert formatting.
//!
//! Events are first reduced to an [`Alert`], then rendered per channel:
//! Telegram wants `MarkdownV2` with escaping, Discord takes plain markdown
//! capped at [`DISCORD_MAX_CHARS`].

use rust_decimal::Decimal;

use crate::port::Event;

/// Discord rejects message content longer than this.
pub const DISCORD_MAX_CHARS: usize = 2000;

/// Which events reach alert channels.
///
/// Partial fills and cycle failures are always sent.
#[derive(Debug, Clone, Copy)]
pub struct AlertFilter {
    pub notify_opportunities: bool,
    pub notify_executions: bool,
}

impl Default for AlertFilter {
    fn default() -> Self {
        Self {
            notify_opportunities: false,
            notify_executions: true,
        }
    }
}

/// A formatted alert: one headline and a few `label: value` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub emoji: &'static str,
    pub headline: &'static str,
    pub lines: Vec<(&'static str, String)>,
}

impl Alert {
    /// Build the alert for `event`, or `None` if the filter drops it.
    #[must_use]
    pub fn from_event(event: &Event, filter: AlertFilter) -> Option<Self> {
        match event {
            Event::OpportunityDetected(e) if filter.notify_opportunities => Some(Self {
                emoji: "🎯",
                headline: "Opportunity Detected",
                lines: vec![
                    ("Market", truncate(&e.title, 80)),
                    ("Buy YES", format!("{} @ {}", e.yes_venue, e.yes_price)),
                    ("Buy NO", format!("{} @ {}", e.no_venue, e.no_price)),
                    ("Net", format!("{:.2}%", e.net_profit_pct.round_dp(2))),
                    ("Size", usd(e.size_usd)),
                ],
            }),
            Event::ExecutionCompleted(e) if filter.notify_executions => {
                let (emoji, headline) = if e.success {
                    ("✅", "Trade Executed")
                } else {
                    ("❌", "Execution Failed")
                };
                Some(Self {
                    emoji,
                    headline,
                    lines: vec![
                        ("Market", truncate(&e.title, 80)),
                        ("Size", usd(e.size_usd)),
                        ("Details", e.details.clone()),
                    ],
                })
            }
            Event::PartialFill {
                title,
                filled,
                failed,
                order_id,
                reason,
            } => Some(Self {
                emoji: "🚨",
                headline: "Partial Fill",
                lines: vec![
                    ("Market", truncate(title, 80)),
                    ("Filled", format!("{filled} ({order_id})")),
                    ("Failed", format!("{failed}: {reason}")),
                    ("Action", "unhedged position, close manually".to_string()),
                ],
            }),
            Event::CycleFailed { reason } => Some(Self {
                emoji: "⚠️",
                headline: "Scan Cycle Failed",
                lines: vec![("Reason", reason.clone())],
            }),
            _ => None,
        }
    }

    /// Plain markdown, as accepted by Discord, capped at `max_chars`.
    #[must_use]
    pub fn to_plain(&self, max_chars: usize) -> String {
        let mut text = format!("{} **{}**", self.emoji, self.headline);
        for (label, value) in &self.lines {
            text.push_str(&format!("\n{label}: {value}"));
        }
        cap(&text, max_chars)
    }

    /// Telegram `MarkdownV2` with every value escaped.
    #[must_use]
    pub fn to_markdown_v2(&self) -> String {
        let mut text = format!("{} *{}*\n", self.emoji, escape_markdown(self.headline));
        for (label, value) in &self.lines {
            text.push_str(&format!(
                "\n{}: `{}`",
                escape_markdown(label),
                escape_code(value)
            ));
        }
        text
    }
}

fn usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Truncate a string with ellipsis (Unicode-safe).
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Hard cap on total length, ellipsis included.
fn cap(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Escape special characters for Telegram `MarkdownV2`.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Inside inline code only backtick and backslash need escaping.
fn escape_code(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`")
}
