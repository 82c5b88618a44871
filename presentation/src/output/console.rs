//! Console output formatter for audit results

use colored::Colorize;
use footing_application::{BatchSummary, CompanyAuditOutput, ConsensusConfig};
use footing_domain::{
    AuditResult, CompanyAudit, ConfigIssue, ConsensusQuality, FootingStatus, ProviderSettings,
    Severity, total_assets_item,
};
use rust_decimal::Decimal;
use std::path::Path;

/// Formats audit results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner printed once before any company is audited
    pub fn run_header(settings: &ProviderSettings, config: &ConsensusConfig) -> String {
        let title = format!("{} {} AUDIT", settings.kind.as_str().to_uppercase(), system_name(config.agent_count));
        let mut output = Self::header(&title);
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Model:".cyan().bold(), settings.model));
        output.push_str(&format!(
            "{} {} agents, tolerance {}, max {} retries\n",
            "Consensus:".cyan().bold(),
            config.agent_count,
            config.tolerance,
            config.max_retries
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Sections:".cyan().bold(),
            config
                .sections
                .iter()
                .map(|section| section.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output
    }

    /// Summary of one company's audit
    pub fn format_company(output: &CompanyAuditOutput) -> String {
        let audit = &output.audit;
        let run = audit.run();
        let mut out = String::new();

        out.push('\n');
        out.push_str(&Self::header(&format!("AUDIT SUMMARY FOR {}", audit.company())));
        out.push('\n');

        out.push_str(&format!("{} {}\n", "System:".cyan().bold(), run.system_type()));
        out.push_str(&format!("{} {}\n", "Company:".cyan().bold(), audit.company()));
        out.push_str(&format!(
            "{} {}\n",
            "Consensus:".cyan().bold(),
            quality_label(audit.quality())
        ));
        out.push_str(&format!("{} {}\n", "Retries:".cyan().bold(), audit.total_retries()));
        out.push_str(&format!(
            "{} {}\n",
            "Timestamp:".cyan().bold(),
            run.timestamp.as_deref().unwrap_or("Unknown")
        ));

        let merged = audit.merged_sections();
        if let Some(total_assets) = total_assets_item(&merged) {
            let status = total_assets.status(audit_tolerance(audit));
            out.push_str(&format!(
                "{} {}\n",
                "Total Assets:".cyan().bold(),
                format_amount(total_assets.reported)
            ));
            out.push_str(&format!("{} {}\n", "Status:".cyan().bold(), footing_label(status)));
        }

        let balancing = audit.balancing();
        let balance = if balancing.is_balanced() {
            balancing.status.to_string().green()
        } else {
            balancing.status.to_string().red()
        };
        out.push_str(&format!("{} {}\n", "Balance:".cyan().bold(), balance));

        out.push_str(&Self::section_header("Statements"));
        for result in audit.section_results() {
            out.push_str(&Self::format_section(result));
        }
        for section in &output.skipped {
            out.push_str(&format!(
                "  {} {} (no document)\n",
                "-".dimmed(),
                section.display_name().dimmed()
            ));
        }

        if let Some(location) = &output.location {
            out.push_str(&format!("\n{} {}\n", "Saved:".dimmed(), location));
        }

        out.push_str(&Self::footer());
        out
    }

    fn format_section(result: &AuditResult) -> String {
        let mut out = format!(
            "  {} {}: {} in {} round(s), {} line items, {} mismatched\n",
            if result.is_accepted() { "v".green() } else { "x".red() },
            result.section().display_name().bold(),
            quality_label(result.quality()),
            result.rounds_attempted(),
            result.line_items().count(),
            result.mismatch_count()
        );

        if let Some(exhausted) = result.exhaustion() {
            let round = &exhausted.last_round;
            let fields: Vec<&str> = round.disagreements.iter().map(|d| d.field.as_str()).collect();
            if !fields.is_empty() {
                out.push_str(&format!(
                    "      {} {}\n",
                    "disputed:".yellow(),
                    fields.join(", ")
                ));
            }
            for failure in &round.failures {
                out.push_str(&format!(
                    "      {} {}: {}\n",
                    "failed:".yellow(),
                    failure.agent_id,
                    failure.message
                ));
            }
        }
        out
    }

    /// The persisted audit JSON
    pub fn format_json(audit: &CompanyAudit) -> String {
        serde_json::to_string_pretty(audit).unwrap_or_else(|_| "{}".to_string())
    }

    /// Final summary of a batch run
    pub fn format_batch(
        summary: &BatchSummary,
        settings: &ProviderSettings,
        agent_count: usize,
        output_dir: &Path,
    ) -> String {
        let mut out = String::new();
        let line = "=".repeat(80);
        out.push_str(&format!(
            "\n{}\n{}\n{}\n",
            line.cyan(),
            format!(
                "{} {} BATCH AUDIT SUMMARY",
                settings.kind.as_str().to_uppercase(),
                system_name(agent_count)
            )
            .bold(),
            line.cyan()
        ));

        out.push_str(&format!(
            "{} Successful audits: {} companies ({} with full consensus)\n",
            "v".green(),
            summary.succeeded.len(),
            summary.fully_accepted()
        ));
        for output in &summary.succeeded {
            out.push_str(&format!(
                "   - {} ({})\n",
                output.audit.company(),
                quality_label(output.audit.quality())
            ));
        }

        if !summary.failed.is_empty() {
            out.push_str(&format!(
                "\n{} Failed audits: {} companies\n",
                "x".red(),
                summary.failed.len()
            ));
            for failure in &summary.failed {
                out.push_str(&format!("   - {}: {}\n", failure.company, failure.reason));
            }
        }

        out.push_str(&format!(
            "\nAll results saved to {}/ folder\n",
            output_dir.display()
        ));
        out
    }

    /// Configuration problems, errors first
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<&ConfigIssue> = issues.iter().collect();
        sorted.sort_by_key(|issue| !issue.is_error());

        sorted
            .into_iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}\n", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}\n", "warning:".yellow().bold(), issue.message),
            })
            .collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

fn system_name(agent_count: usize) -> String {
    if agent_count == 3 {
        "TRIPLE AGENT".to_string()
    } else {
        format!("{}-AGENT", agent_count)
    }
}

fn audit_tolerance(audit: &CompanyAudit) -> Decimal {
    audit
        .section_results()
        .first()
        .map(|result| result.policy().footing_tolerance)
        .unwrap_or(Decimal::ONE)
}

fn quality_label(quality: ConsensusQuality) -> colored::ColoredString {
    match quality {
        ConsensusQuality::Perfect => quality.as_str().green(),
        ConsensusQuality::Retried => quality.as_str().yellow(),
        ConsensusQuality::Failed => quality.as_str().red(),
    }
}

fn footing_label(status: FootingStatus) -> colored::ColoredString {
    match status {
        FootingStatus::Ok => status.as_str().green(),
        FootingStatus::Mismatch => status.as_str().red(),
    }
}

/// Apply the `[output] color` setting.
///
/// `false` forces plain text. `true` leaves terminal detection (and
/// `NO_COLOR`) to `colored`.
pub fn apply_color_setting(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

/// Whole-unit amount with thousands separators, e.g. `-1,234,568`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(0).abs().trunc().to_string();
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount.round_dp(0).is_sign_negative() && !grouped.chars().all(|c| c == '0') {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
