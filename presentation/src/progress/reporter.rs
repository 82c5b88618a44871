//! Progress reporting for consensus audits

use colored::Colorize;
use footing_application::AuditProgressNotifier;
use footing_domain::{AuditResult, DocumentRef, RoundVerdict};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports progress with one bar per document in flight
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, document: &DocumentRef, f: impl FnOnce(&ProgressBar)) {
        if let Ok(bars) = self.bars.lock()
            && let Some(bar) = bars.get(&document.to_string())
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditProgressNotifier for ProgressReporter {
    fn on_round_start(&self, document: &DocumentRef, round_index: usize, agent_count: usize) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        let bar = bars.entry(document.to_string()).or_insert_with(|| {
            let bar = self.multi.add(ProgressBar::new(agent_count as u64));
            bar.set_style(Self::round_style());
            bar
        });
        bar.reset();
        bar.set_length(agent_count as u64);
        bar.set_prefix(format!("{} round {}", document, round_index + 1));
        bar.set_message("extracting...");
    }

    fn on_agent_complete(&self, document: &DocumentRef, agent_id: &str, success: bool) {
        self.with_bar(document, |bar| {
            let status = if success {
                format!("{} {}", "v".green(), agent_id)
            } else {
                format!("{} {}", "x".red(), agent_id)
            };
            bar.set_message(status);
            bar.inc(1);
        });
    }

    fn on_round_complete(&self, document: &DocumentRef, _round_index: usize, verdict: RoundVerdict) {
        self.with_bar(document, |bar| {
            let verdict = match verdict {
                RoundVerdict::Agree => verdict.as_str().green(),
                _ => verdict.as_str().yellow(),
            };
            bar.set_message(verdict.to_string());
        });
    }

    fn on_document_complete(&self, result: &AuditResult) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        if let Some(bar) = bars.remove(&result.document().to_string()) {
            let message = if result.is_accepted() {
                format!("{} ({})", "accepted".green(), result.quality())
            } else {
                format!("{} after {} rounds", "no consensus".red(), result.rounds_attempted())
            };
            bar.finish_with_message(message);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl AuditProgressNotifier for SimpleProgress {
    fn on_round_start(&self, document: &DocumentRef, round_index: usize, agent_count: usize) {
        println!(
            "{} {} round {} ({} agents)",
            "->".cyan(),
            document.to_string().bold(),
            round_index + 1,
            agent_count
        );
    }

    fn on_agent_complete(&self, _document: &DocumentRef, agent_id: &str, success: bool) {
        if success {
            println!("  {} {}", "v".green(), agent_id);
        } else {
            println!("  {} {} (failed)", "x".red(), agent_id);
        }
    }

    fn on_round_complete(&self, _document: &DocumentRef, _round_index: usize, verdict: RoundVerdict) {
        println!("  = {}", verdict);
    }

    fn on_document_complete(&self, result: &AuditResult) {
        println!(
            "{} {}: {}\n",
            "<-".cyan(),
            result.document(),
            result.quality()
        );
    }
}
