//! CLI output formatting

use crate::synthesis::{MergeReport, SynthesisOutcome};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");

/// Format one stage merge for display
pub fn format_merge_report(report: &MergeReport) -> String {
    let mut line = if report.created {
        format!(
            "{} {} (new stage): {} step(s)",
            INFO,
            style(&report.stage).cyan(),
            style(report.appended_steps).green()
        )
    } else {
        format!(
            "{} {}: +{} step(s)",
            INFO,
            style(&report.stage).cyan(),
            style(report.appended_steps).green()
        )
    };

    if !report.skipped_ids.is_empty() {
        line.push_str(&format!(
            ", kept existing {}",
            style(report.skipped_ids.join(", ")).yellow()
        ));
    }
    if !report.adopted_attributes.is_empty() {
        line.push_str(&format!(
            ", attributes {}",
            style(report.adopted_attributes.join(", ")).dim()
        ));
    }
    line
}

/// Format an environment's synthesis result for display
pub fn format_outcome(outcome: &SynthesisOutcome) -> String {
    format!(
        "{} {} → {} ({} step(s) merged, {} duplicate(s) skipped)",
        CHECK,
        style(&outcome.environment).bold(),
        style(outcome.path.display()).dim(),
        style(outcome.appended_steps()).green(),
        style(outcome.skipped_ids()).yellow()
    )
}
