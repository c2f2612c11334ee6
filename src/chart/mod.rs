//! Radar chart capability.
//!
//! Whether the chart can be drawn is decided up front by [`detect_capability`];
//! callers render the fallback notice for any [`UnavailableReason`] instead of
//! trapping errors from the renderer.

#[cfg(feature = "radar")]
pub mod radar;

use ratatui::layout::Rect;
use std::fmt;

use crate::scoring::OutcomeScore;

pub const CHART_TITLE: &str = "Climate Readiness Radar Chart";

/// Smallest area (inside borders) the radar is drawn into
pub const MIN_CHART_WIDTH: u16 = 24;
pub const MIN_CHART_HEIGHT: u16 = 8;

/// A polygon needs at least three axes
pub const MIN_AXES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Built without the `radar` feature
    NotCompiled,
    /// Turned off by flag, config, or key toggle
    Disabled,
    TooSmall,
    TooFewAxes,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::NotCompiled => write!(f, "built without radar support"),
            UnavailableReason::Disabled => write!(f, "disabled"),
            UnavailableReason::TooSmall => write!(f, "terminal too small"),
            UnavailableReason::TooFewAxes => {
                write!(f, "needs at least {} outcomes", MIN_AXES)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartCapability {
    Available,
    Unavailable(UnavailableReason),
}

pub fn radar_compiled() -> bool {
    cfg!(feature = "radar")
}

/// Decide whether a radar with `axes` outcomes can be drawn into `area`.
pub fn detect_capability(enabled: bool, area: Rect, axes: usize) -> ChartCapability {
    if !radar_compiled() {
        return ChartCapability::Unavailable(UnavailableReason::NotCompiled);
    }
    if !enabled {
        return ChartCapability::Unavailable(UnavailableReason::Disabled);
    }
    if axes < MIN_AXES {
        return ChartCapability::Unavailable(UnavailableReason::TooFewAxes);
    }
    if area.width < MIN_CHART_WIDTH || area.height < MIN_CHART_HEIGHT {
        return ChartCapability::Unavailable(UnavailableReason::TooSmall);
    }
    ChartCapability::Available
}

/// Informational notice shown in place of the chart
pub fn fallback_notice(reason: UnavailableReason) -> String {
    format!(
        "Radar chart not available ({}), skipping radar chart.",
        reason
    )
}

/// Radar chart as plain text in a `width` x `height` box, or the fallback
/// notice when it cannot be drawn there.
pub fn text_chart(outcomes: &[OutcomeScore], enabled: bool, width: u16, height: u16) -> String {
    // Capability is checked against the area inside the border
    let inner = Rect::new(0, 0, width.saturating_sub(2), height.saturating_sub(2));
    match detect_capability(enabled, inner, outcomes.len()) {
        #[cfg(feature = "radar")]
        ChartCapability::Available => radar::render_to_text(outcomes, width, height),
        #[cfg(not(feature = "radar"))]
        ChartCapability::Available => fallback_notice(UnavailableReason::NotCompiled),
        ChartCapability::Unavailable(reason) => fallback_notice(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{calculate_outcomes, Catalog, DriverScores, EvaluationMode};

    fn default_outcomes() -> Vec<OutcomeScore> {
        let catalog = Catalog::default();
        let scores = DriverScores::from_catalog(&catalog);
        calculate_outcomes(&scores, &catalog, EvaluationMode::InputsOnly)
    }

    #[test]
    fn test_disabled() {
        let area = Rect::new(0, 0, 80, 24);
        let cap = detect_capability(false, area, 4);
        if radar_compiled() {
            assert_eq!(cap, ChartCapability::Unavailable(UnavailableReason::Disabled));
        } else {
            assert_eq!(cap, ChartCapability::Unavailable(UnavailableReason::NotCompiled));
        }
    }

    #[cfg(feature = "radar")]
    #[test]
    fn test_available() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(detect_capability(true, area, 4), ChartCapability::Available);
    }

    #[cfg(feature = "radar")]
    #[test]
    fn test_too_small() {
        let area = Rect::new(0, 0, 10, 4);
        assert_eq!(
            detect_capability(true, area, 4),
            ChartCapability::Unavailable(UnavailableReason::TooSmall)
        );
    }

    #[cfg(feature = "radar")]
    #[test]
    fn test_too_few_axes() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(
            detect_capability(true, area, 2),
            ChartCapability::Unavailable(UnavailableReason::TooFewAxes)
        );
    }

    #[test]
    fn test_fallback_notice() {
        let notice = fallback_notice(UnavailableReason::TooSmall);
        assert_eq!(
            notice,
            "Radar chart not available (terminal too small), skipping radar chart."
        );
    }

    #[test]
    fn test_text_chart_disabled_prints_notice() {
        let text = text_chart(&default_outcomes(), false, 72, 24);
        let reason = if radar_compiled() {
            UnavailableReason::Disabled
        } else {
            UnavailableReason::NotCompiled
        };
        assert_eq!(text, fallback_notice(reason));
    }

    #[cfg(feature = "radar")]
    #[test]
    fn test_text_chart_fallbacks() {
        let outcomes = default_outcomes();
        assert_eq!(
            text_chart(&outcomes[..2], true, 72, 24),
            "Radar chart not available (needs at least 3 outcomes), skipping radar chart."
        );
        assert_eq!(
            text_chart(&outcomes, true, 20, 6),
            fallback_notice(UnavailableReason::TooSmall)
        );
    }

    #[cfg(feature = "radar")]
    #[test]
    fn test_text_chart_draws_radar() {
        let text = text_chart(&default_outcomes(), true, 72, 24);
        assert!(text.contains(CHART_TITLE));
        assert!(text.contains("Climate Tech Maturity 4.00"));
    }
}
