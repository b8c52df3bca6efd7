use ratatui::style::Color;

use crate::ui::theme::Theme;

/// ASCII budget bar with a trailing percent label.
///
/// The fill is clamped to the bar width but the label keeps the real
/// percentage, so an overspent category reads `██████████ 120%`.
#[must_use]
pub fn budget_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0 * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);
    format!(
        "{}{} {:.0}%",
        "█".repeat(filled),
        "░".repeat(empty),
        percent.max(0.0)
    )
}

/// Green up to 80%, amber up to 100%, red beyond.
#[must_use]
pub fn percent_color(percent: f64, theme: &Theme) -> Color {
    if percent <= 80.0 {
        theme.positive
    } else if percent <= 100.0 {
        theme.warning
    } else {
        theme.negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fill_tracks_percent() {
        assert_eq!(budget_bar(0.0, 10), "░░░░░░░░░░ 0%");
        assert_eq!(budget_bar(50.0, 10), "█████░░░░░ 50%");
        assert_eq!(budget_bar(100.0, 10), "██████████ 100%");
    }

    #[test]
    fn overspend_fills_bar_but_keeps_label() {
        assert_eq!(budget_bar(120.0, 10), "██████████ 120%");
    }

    #[test]
    fn colors_switch_at_thresholds() {
        let theme = Theme::default();
        assert_eq!(percent_color(80.0, &theme), theme.positive);
        assert_eq!(percent_color(80.1, &theme), theme.warning);
        assert_eq!(percent_color(100.0, &theme), theme.warning);
        assert_eq!(percent_color(100.1, &theme), theme.negative);
    }
}
