//! Colorful console output for elicitation runs.
//!
//! Provides a custom `tracing` layer that formats run events with colors.
//! Installed by [`init`], which [`elicit`](crate::elicit) calls when the
//! `console` feature is enabled.

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{debug, Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, Layer};

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Initializes the console output.
///
/// Safe to call multiple times; only the first call has effect. Returns
/// whether the console layer became the global subscriber, which fails when
/// another one is already set.
pub fn init() -> bool {
    *INSTALLED.get_or_init(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "minimax_strategy=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        match tracing_subscriber::registry()
            .with(filter)
            .with(ElicitationConsoleLayer)
            .try_init()
        {
            Ok(()) => true,
            Err(e) => {
                debug!(event = "console_not_installed", error = %e);
                false
            }
        }
    })
}

/// A tracing layer that formats elicitation events with colors.
pub struct ElicitationConsoleLayer;

impl<S: Subscriber> Layer<S> for ElicitationConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("minimax") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    strategy: Option<String>,
    reason: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    seed: Option<u64>,
    alternatives: Option<u64>,
    voters: Option<u64>,
    index: Option<u64>,
    questions: Option<u64>,
    voter_questions: Option<u64>,
    committee_questions: Option<u64>,
    duration_ms: Option<u64>,
    mmr: Option<f64>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "strategy" => self.strategy = Some(value),
            "reason" => self.reason = Some(value),
            "question" => self.question = Some(value),
            "answer" => self.answer = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "seed" => self.seed = Some(value),
            "alternatives" => self.alternatives = Some(value),
            "voters" => self.voters = Some(value),
            "index" => self.index = Some(value),
            "questions" => self.questions = Some(value),
            "voter_questions" => self.voter_questions = Some(value),
            "committee_questions" => self.committee_questions = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "mmr" {
            self.mmr = Some(value);
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "run_start" => format_run_start(v),
        "question_answered" => format_question(v),
        "strategy_exhausted" => format_exhausted(v),
        "run_end" => format_run_end(v),
        _ => String::new(),
    }
}

fn format_run_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {} seed ({}), alternatives ({}), voters ({}), initial MMR ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Elicitation]".bright_cyan(),
        v.strategy.as_deref().unwrap_or("Unknown").white().bold(),
        v.seed.unwrap_or(0).to_string().yellow(),
        v.alternatives.unwrap_or(0).to_string().bright_yellow(),
        v.voters.unwrap_or(0).to_string().bright_yellow(),
        format_mmr(v.mmr),
    )
}

fn format_question(v: &EventVisitor) -> String {
    format!(
        "    {} Q{:>4} | {} -> {} | MMR {}",
        "->".bright_blue(),
        v.index.unwrap_or(0).to_string().white(),
        v.question.as_deref().unwrap_or("?"),
        v.answer.as_deref().unwrap_or("?").bright_white(),
        format_mmr(v.mmr),
    )
}

fn format_exhausted(v: &EventVisitor) -> String {
    format!(
        "{} {} {} strategy exhausted: {}",
        timestamp().bright_black(),
        "WARN".bright_yellow(),
        "[Elicitation]".bright_cyan(),
        v.reason.as_deref().unwrap_or(""),
    )
}

fn format_run_end(v: &EventVisitor) -> String {
    let mmr = v.mmr.unwrap_or(f64::INFINITY);
    let mut output = format!(
        "{} {} {} Elicitation ended ({}): time spent ({}), questions ({} voter, {} committee), MMR ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Elicitation]".bright_cyan(),
        v.reason.as_deref().unwrap_or("unknown"),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.voter_questions.unwrap_or(0).to_string().white(),
        v.committee_questions.unwrap_or(0).to_string().white(),
        format_mmr(v.mmr),
    );

    output.push_str("\n\n");
    output.push_str(&"╔══════════════════════════════════════════════════════════╗".bright_cyan().to_string());
    output.push('\n');

    let status_text = if mmr <= 1e-6 {
        "WINNER DETERMINED"
    } else {
        "REGRET REMAINS"
    };
    let status_colored = if mmr <= 1e-6 {
        format!("  {}  ", status_text).bright_green().bold().to_string()
    } else {
        format!("  {}  ", status_text).bright_yellow().bold().to_string()
    };
    let status_padding = 56 - status_text.len() - 4;
    let left_pad = status_padding / 2;
    let right_pad = status_padding - left_pad;
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(&"╠══════════════════════════════════════════════════════════╣".bright_cyan().to_string());
    output.push('\n');

    output.push_str(&format!(
        "{}  {:<18}{:>36}  {}",
        "║".bright_cyan(),
        "Questions:",
        v.questions.unwrap_or(0),
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(&format!(
        "{}  {:<18}{:>36.6}  {}",
        "║".bright_cyan(),
        "Final MMR:",
        mmr,
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(&"╚══════════════════════════════════════════════════════════╝".bright_cyan().to_string());
    output.push('\n');

    output
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_mmr(mmr: Option<f64>) -> String {
    match mmr {
        Some(value) if value <= 1e-6 => format!("{:.4}", value).bright_green().to_string(),
        Some(value) => format!("{:.4}", value).yellow().to_string(),
        None => "N/A".white().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let first = init();
        assert_eq!(init(), first);
    }

    #[test]
    fn test_duration_format() {
        assert_eq!(format_duration_ms(15), "15ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_event_is_silent() {
        let visitor = EventVisitor {
            event: Some("lottery".into()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).is_empty());
    }

    #[test]
    fn test_run_end_summary() {
        let visitor = EventVisitor {
            event: Some("run_end".into()),
            reason: Some("zero regret".into()),
            questions: Some(4),
            mmr: Some(0.0),
            ..EventVisitor::default()
        };
        let output = format_event(&visitor);
        assert!(output.contains("zero regret"));
        assert!(output.contains("WINNER DETERMINED"));
    }
}
