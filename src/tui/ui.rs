use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap};

use super::app::{App, InputMode};
use super::theme::ThemeColors;
use crate::chart::{self, ChartCapability, UnavailableReason, CHART_TITLE};
use crate::output::{format_score, source_label, OUTCOME_HEADER, SCORE_HEADER};
use crate::scoring::{FactorSource, MAX_SCORE, MIN_SCORE};

const APP_TITLE: &str = "Climate Tech Readiness Simulator";
const SUBTITLE: &str =
    "Use the sliders to simulate a company's readiness to adopt climate technologies.";
const DRIVER_PANEL_WIDTH: u16 = 50;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Subtitle
        Constraint::Fill(1),   // Body
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let body = Layout::horizontal([
        Constraint::Length(DRIVER_PANEL_WIDTH), // Sliders
        Constraint::Fill(1),                    // Results + chart
    ])
    .split(chunks[2]);

    let right = Layout::vertical([
        Constraint::Length(app.outcomes.len() as u16 + 4), // Border, header, margin
        Constraint::Fill(1),
    ])
    .split(body[1]);

    render_title(frame, chunks[0], app);
    frame.render_widget(
        Paragraph::new(SUBTITLE).style(Style::default().fg(app.theme.muted)),
        chunks[1],
    );
    render_drivers(frame, body[0], app);
    render_results(frame, right[0], app);
    render_chart(frame, right[1], app);
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Help => render_help_popup(frame, app),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        APP_TITLE,
        Style::default().fg(app.theme.title_color).bold(),
    )];

    let mode_text = format!("mode: {}", app.mode.label());
    let padding_len = (area.width as usize).saturating_sub(APP_TITLE.len() + mode_text.len());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(mode_text, Style::default().fg(app.theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn panel(title: &str, theme: &ThemeColors) -> Block<'static> {
    Block::bordered()
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(theme.panel_border))
}

fn render_drivers(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let rows: Vec<Row> = app
        .scores
        .iter()
        .zip(app.catalog.drivers.iter())
        .enumerate()
        .map(|(idx, ((name, value), spec))| {
            let changed = value != spec.default;
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };
            let value_style = if changed {
                Style::default().fg(theme.slider_changed).bold()
            } else {
                Style::default().bold()
            };

            Row::new(vec![
                Cell::from(name.to_string()),
                Cell::from(slider_bar(value, changed, theme)),
                Cell::from(value.to_string()).style(value_style),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),    // Driver name
        Constraint::Length(10), // Slider: 5 steps x 2 cells
        Constraint::Length(2),  // Value
    ];

    let table = Table::new(rows, widths)
        .block(panel("Input Driver Scores (1–5)", theme))
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.driver_state);
}

fn slider_bar(value: u8, changed: bool, theme: &ThemeColors) -> Line<'static> {
    let filled_color = if changed {
        theme.slider_changed
    } else {
        theme.slider_filled
    };
    let filled = (value.saturating_sub(MIN_SCORE) + 1) as usize * 2;
    let empty = (MAX_SCORE - MIN_SCORE + 1) as usize * 2 - filled;

    Line::from(vec![
        Span::styled("█".repeat(filled), Style::default().fg(filled_color)),
        Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)),
    ])
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    if app.outcomes.is_empty() {
        let empty_msg = Paragraph::new("No outcomes defined")
            .alignment(Alignment::Center)
            .block(panel("Simulation Results", &app.theme));
        frame.render_widget(empty_msg, area);
        return;
    }

    let rows: Vec<Row> = app
        .outcomes
        .iter()
        .enumerate()
        .map(|(idx, outcome)| {
            let color = app.theme.score_color(outcome.score);
            let row = Row::new(vec![
                Cell::from(outcome.name.clone()),
                Cell::from(
                    Line::from(format!("{:>11}", format_score(outcome.score)))
                        .style(Style::default().fg(color).bold()),
                ),
                Cell::from(score_bar(outcome.score, 10, &app.theme)),
            ]);
            if idx == app.selected_outcome {
                row.style(Style::default().bg(app.theme.row_alt_bg))
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Fill(1),    // Outcome name
        Constraint::Length(11), // "Score (1–5)"
        Constraint::Length(10), // Bar
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![OUTCOME_HEADER, SCORE_HEADER, ""])
                .style(app.theme.header_style)
                .bottom_margin(1),
        )
        .block(panel("Simulation Results", &app.theme));

    frame.render_widget(table, area);
}

fn score_bar(score: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let ratio = (score / MAX_SCORE as f64).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.score_color(score)),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(theme.bar_empty),
        ));
    }

    Line::from(spans)
}

fn render_chart(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel(CHART_TITLE, &app.theme);
    let inner = block.inner(area);

    match chart::detect_capability(app.chart_enabled, inner, app.outcomes.len()) {
        ChartCapability::Available => render_radar(frame, area, block, app),
        ChartCapability::Unavailable(reason) => render_chart_notice(frame, area, block, reason, app),
    }
}

#[cfg(feature = "radar")]
fn render_radar(frame: &mut Frame, area: Rect, block: Block<'static>, app: &App) {
    let radar = chart::radar::RadarChart::new(&app.outcomes, &app.theme).block(block);
    frame.render_widget(radar, area);
}

#[cfg(not(feature = "radar"))]
fn render_radar(frame: &mut Frame, area: Rect, block: Block<'static>, app: &App) {
    render_chart_notice(frame, area, block, UnavailableReason::NotCompiled, app);
}

fn render_chart_notice(
    frame: &mut Frame,
    area: Rect,
    block: Block<'static>,
    reason: UnavailableReason,
    app: &App,
) {
    let notice = Paragraph::new(chart::fallback_notice(reason))
        .style(Style::default().fg(app.theme.muted))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(notice, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") {
            app.theme.flash_error
        } else {
            app.theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let chart_state = if app.chart_enabled { "chart on" } else { "chart off" };

        // Build hints with colored shortcut keys
        let hints = [
            ("j/k", ":select "),
            ("h/l", ":adjust "),
            ("1-5", ":set "),
            ("r", ":reset "),
            ("m", ":mode "),
            ("c", ":chart "),
            ("b", ":breakdown "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(
                format!("{} drivers", app.scores.len()),
                Style::default().fg(app.theme.muted),
            ),
            Span::raw(" "),
            Span::styled(chart_state, Style::default().fg(app.theme.muted)),
            Span::raw("  "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(app.theme.status_key_color),
            ));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(50, 16, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .title_style(app.theme.popup_title)
        .border_style(Style::default().fg(app.theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).bold();
    let entries = [
        ("j / Down      ", "Next driver"),
        ("k / Up        ", "Previous driver"),
        ("l / Right / + ", "Raise score by one"),
        ("h / Left / -  ", "Lower score by one"),
        ("1 - 5         ", "Set score directly"),
        ("r             ", "Reset all drivers to defaults"),
        ("m             ", "Toggle evaluation mode"),
        ("c             ", "Toggle radar chart"),
        ("Tab           ", "Select next outcome"),
        ("b             ", "Score breakdown for outcome"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the per-factor breakdown of the selected outcome
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let Some(outcome) = app.selected_outcome() else {
        return;
    };

    let height = outcome.factors.len() as u16 + 7;
    let popup_area = centered_rect_fixed(64, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(format!(" {} ", outcome.name))
        .title_style(app.theme.popup_title)
        .border_style(Style::default().fg(app.theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![Line::from(Span::styled(
        format!("{:<30}{:>8}{:>8}  {}", "Factor", "Weight", "Score", "Source"),
        app.theme.header_style,
    ))];

    let mut weighted_sum = 0.0;
    let mut total_weight: u64 = 0;
    for factor in &outcome.factors {
        weighted_sum += factor.score * factor.weight as f64;
        total_weight += factor.weight as u64;

        let style = if factor.source == FactorSource::Default {
            Style::default().fg(app.theme.score_mid)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{:<30}{:>8}{:>8.2}  {}",
                factor.name,
                factor.weight,
                factor.score,
                source_label(factor.source)
            ),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw(format!("{:.2} / {} = ", weighted_sum, total_weight)),
        Span::styled(
            format_score(outcome.score),
            Style::default().fg(app.theme.score_color(outcome.score)).bold(),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        "Tab: next outcome | Esc: close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Catalog, EvaluationMode};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer.cell((x, y)).map_or(" ", |c| c.symbol()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn new_app(chart: bool) -> App {
        App::new(Catalog::default(), EvaluationMode::InputsOnly, chart, false)
    }

    #[test]
    fn test_draw_shows_drivers_and_results() {
        let mut app = new_app(true);
        let screen = render(&mut app, 130, 40);
        assert!(screen.contains(APP_TITLE));
        assert!(screen.contains("mode: inputs-only"));
        assert!(screen.contains("Leadership Commitment"));
        assert!(screen.contains("Legacy Asset Intensity"));
        assert!(screen.contains("Readiness Outcome"));
        assert!(screen.contains("4.00"));
        assert!(screen.contains("3.74"));
        assert!(screen.contains("3.38"));
    }

    #[cfg(feature = "radar")]
    #[test]
    fn test_draw_shows_radar_when_available() {
        let mut app = new_app(true);
        let screen = render(&mut app, 130, 40);
        assert!(screen.contains(CHART_TITLE));
        assert!(!screen.contains("Radar chart not available"));
    }

    #[test]
    fn test_draw_shows_fallback_when_disabled() {
        let mut app = new_app(false);
        let screen = render(&mut app, 130, 40);
        assert!(screen.contains("Radar chart not available"));
        // Table is unaffected
        assert!(screen.contains("3.38"));
    }

    #[test]
    fn test_small_terminal_falls_back() {
        let mut app = new_app(true);
        let screen = render(&mut app, 80, 14);
        assert!(screen.contains("Radar chart not available"));
    }

    #[test]
    fn test_breakdown_popup() {
        let mut app = new_app(true);
        app.next_outcome();
        app.show_score_breakdown();
        let screen = render(&mut app, 130, 40);
        assert!(screen.contains("Sector Type"));
        assert!(screen.contains("71.00 / 19 = 3.74"));
    }

    #[test]
    fn test_help_popup() {
        let mut app = new_app(true);
        app.show_help();
        let screen = render(&mut app, 130, 40);
        assert!(screen.contains("Keyboard Shortcuts"));
        assert!(screen.contains("Toggle evaluation mode"));
    }

    #[test]
    fn test_slider_bar_widths() {
        let theme = ThemeColors::dark();
        let line = slider_bar(1, false, &theme);
        assert_eq!(line.spans[0].content.chars().count(), 2);
        assert_eq!(line.spans[1].content.chars().count(), 8);
        let line = slider_bar(5, true, &theme);
        assert_eq!(line.spans[0].content.chars().count(), 10);
        assert_eq!(line.spans[1].content.chars().count(), 0);
    }
}
