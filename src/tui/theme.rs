//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::scoring::MAX_SCORE;

/// Complete color palette for the TUI and the radar chart
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Score-based colors (traffic light, high readiness is good)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,

    // Bar colors (outcome score bars and driver sliders)
    pub bar_empty: Color,
    pub slider_filled: Color,
    pub slider_changed: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Panel borders
    pub panel_border: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,

    // Radar chart colors
    pub radar_grid: Color,
    pub radar_outline: Color,
    pub radar_fill: Color,
    pub radar_label: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            bar_empty: Color::DarkGray,
            slider_filled: Color::Cyan,
            slider_changed: Color::Magenta,
            row_alt_bg: Color::Indexed(235),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            panel_border: Color::Indexed(240),
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            radar_grid: Color::Indexed(238),
            radar_outline: Color::Cyan,
            radar_fill: Color::Indexed(24),
            radar_label: Color::Gray,
        }
    }

    /// Color for a 1-5 readiness score by its share of the maximum
    pub fn score_color(&self, score: f64) -> Color {
        let percentage = (score / MAX_SCORE as f64) * 100.0;

        if percentage >= 80.0 {
            self.score_high
        } else if percentage >= 50.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_color_bands() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.score_color(5.0), theme.score_high);
        assert_eq!(theme.score_color(4.0), theme.score_high);
        assert_eq!(theme.score_color(3.38), theme.score_mid);
        assert_eq!(theme.score_color(2.5), theme.score_mid);
        assert_eq!(theme.score_color(1.74), theme.score_low);
    }
}
