//! Projection of analysis fields into presentation strings.

use crate::analyzer::perception::LabelMode;
use crate::analyzer::summary::ClipAnalysis;

/// Summary fields rendered for human output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedSummary {
    pub duration: String,
    pub avg_pitch: String,
    pub pitch_range: String,
    /// Average perception score as a 0-100 percentage.
    pub score: u32,
    pub label: String,
    /// Score stability as a 0-100 percentage.
    pub stability: u32,
    /// Share of voiced windows as a 0-100 percentage.
    pub voiced_percent: u32,
}

/// Render a clip analysis into display strings.
pub fn format_summary(analysis: &ClipAnalysis, mode: LabelMode) -> FormattedSummary {
    let summary = &analysis.summary;
    FormattedSummary {
        duration: format!("{:.1}s", analysis.duration),
        avg_pitch: format!("{} Hz", summary.avg_pitch.round() as u32),
        pitch_range: format!(
            "{}–{} Hz",
            summary.pitch_range.min.round() as u32,
            summary.pitch_range.max.round() as u32
        ),
        score: (summary.avg_score * 100.0).round() as u32,
        label: summary_label(summary.avg_score, mode),
        stability: (summary.stability * 100.0).round() as u32,
        voiced_percent: (summary.voiced_percentage * 100.0).round() as u32,
    }
}

/// Clip-level label for an average score, in the configured vocabulary.
///
/// Uses the summary bands (0.3 / 0.45 / 0.55 / 0.7), not the wider
/// per-window bands of
/// [`perception_label`](crate::analyzer::perception::perception_label).
pub fn summary_label(avg_score: f64, mode: LabelMode) -> String {
    let label = match mode {
        LabelMode::Off => "",
        LabelMode::Gendered => crate::analyzer::summary::overall_label(avg_score),
        LabelMode::Neutral => {
            if avg_score < 0.3 {
                "Dark / Low"
            } else if avg_score < 0.45 {
                "Dark-Leaning"
            } else if avg_score < 0.55 {
                "Balanced"
            } else if avg_score < 0.7 {
                "Bright-Leaning"
            } else {
                "Bright / High"
            }
        }
    };
    label.to_string()
}

/// Truncate a display name to `width` characters, eliding with `...`.
/// Counts characters rather than bytes, so multi-byte names never split.
pub fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let head: String = name.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}
