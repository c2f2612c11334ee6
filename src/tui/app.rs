use crate::scoring::{
    calculate_outcomes, cyclic_outcomes, Catalog, DriverScores, EvaluationMode, OutcomeScore,
};
use crate::tui::theme::ThemeColors;
use std::time::Instant;

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    ScoreBreakdown,
}

pub struct App {
    pub catalog: Catalog,
    pub scores: DriverScores,
    pub outcomes: Vec<OutcomeScore>,
    pub mode: EvaluationMode,
    pub chart_enabled: bool,
    pub driver_state: ratatui::widgets::TableState,
    pub selected_outcome: usize,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub verbose: bool,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(catalog: Catalog, mode: EvaluationMode, chart_enabled: bool, verbose: bool) -> Self {
        let scores = DriverScores::from_catalog(&catalog);
        let outcomes = calculate_outcomes(&scores, &catalog, mode);

        let mut driver_state = ratatui::widgets::TableState::default();
        if !scores.is_empty() {
            driver_state.select(Some(0));
        }

        Self {
            catalog,
            scores,
            outcomes,
            mode,
            chart_enabled,
            driver_state,
            selected_outcome: 0,
            input_mode: InputMode::Normal,
            flash_message: None,
            should_quit: false,
            verbose,
            theme: ThemeColors::dark(),
        }
    }

    /// Full recompute from the current slider values
    pub fn recompute(&mut self) {
        self.outcomes = calculate_outcomes(&self.scores, &self.catalog, self.mode);
        if self.verbose {
            let summary: Vec<String> = self
                .outcomes
                .iter()
                .map(|o| format!("{}={:.2}", o.name, o.score))
                .collect();
            crate::buffered_eprintln!("recomputed ({}): {}", self.mode.label(), summary.join(", "));
        }
    }

    pub fn selected_driver(&self) -> Option<(&str, u8)> {
        let idx = self.driver_state.selected()?;
        Some((self.scores.name_at(idx)?, self.scores.value_at(idx)?))
    }

    pub fn selected_outcome(&self) -> Option<&OutcomeScore> {
        self.outcomes.get(self.selected_outcome)
    }

    pub fn next_driver(&mut self) {
        let len = self.scores.len();
        if len == 0 {
            return;
        }
        let i = match self.driver_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.driver_state.select(Some(i));
    }

    pub fn previous_driver(&mut self) {
        let len = self.scores.len();
        if len == 0 {
            return;
        }
        let i = match self.driver_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.driver_state.select(Some(i));
    }

    /// Step the selected slider up one; recomputes only on change
    pub fn increment_selected(&mut self) {
        self.step_selected(true);
    }

    pub fn decrement_selected(&mut self) {
        self.step_selected(false);
    }

    fn step_selected(&mut self, up: bool) {
        let Some((name, before)) = self
            .selected_driver()
            .map(|(name, value)| (name.to_string(), value))
        else {
            return;
        };
        let result = if up {
            self.scores.increment(&name)
        } else {
            self.scores.decrement(&name)
        };
        if matches!(result, Ok(after) if after != before) {
            self.recompute();
        }
    }

    pub fn set_selected(&mut self, value: i64) {
        let Some(idx) = self.driver_state.selected() else {
            return;
        };
        let before = self.scores.value_at(idx);
        let after = self.scores.set_at(idx, value);
        if before != Some(after) {
            self.recompute();
        }
    }

    pub fn reset_all(&mut self) {
        if self.scores.is_default(&self.catalog) {
            self.show_flash("Already at defaults".to_string());
            return;
        }
        self.scores.reset(&self.catalog);
        self.recompute();
        self.show_flash("Reset all drivers to defaults".to_string());
    }

    /// Switch evaluation mode. Staged mode is refused while the catalog
    /// has a dependency cycle.
    pub fn toggle_mode(&mut self) {
        let next = self.mode.toggle();
        if next == EvaluationMode::Staged {
            let cyclic = cyclic_outcomes(&self.catalog);
            if !cyclic.is_empty() {
                let names: Vec<&str> = cyclic
                    .iter()
                    .map(|&idx| self.catalog.outcomes[idx].name.as_str())
                    .collect();
                self.show_flash(format!(
                    "Staged mode unavailable: dependency cycle through {}",
                    names.join(", ")
                ));
                return;
            }
        }
        self.mode = next;
        self.recompute();
        self.show_flash(format!("Evaluation mode: {}", self.mode.label()));
    }

    pub fn toggle_chart(&mut self) {
        self.chart_enabled = !self.chart_enabled;
        let state = if self.chart_enabled { "on" } else { "off" };
        self.show_flash(format!("Radar chart {}", state));
    }

    pub fn next_outcome(&mut self) {
        if self.outcomes.is_empty() {
            return;
        }
        self.selected_outcome = (self.selected_outcome + 1) % self.outcomes.len();
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_score_breakdown(&mut self) {
        if self.selected_outcome().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    pub fn dismiss_score_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }
}
