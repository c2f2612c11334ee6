use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Widget};

use crate::scoring::{OutcomeScore, MAX_SCORE};
use crate::tui::theme::ThemeColors;

const MAX_RADIUS: f64 = MAX_SCORE as f64;
const LABEL_RADIUS: f64 = MAX_RADIUS + 0.7;
const HALF_HEIGHT: f64 = LABEL_RADIUS + 0.6;

/// Angle of axis `i` out of `n`: first axis points up, the rest go clockwise.
pub fn axis_angle(i: usize, n: usize) -> f64 {
    FRAC_PI_2 - TAU * i as f64 / n.max(1) as f64
}

/// Vertices for one radius per axis, closed back to the first point.
pub fn radar_polygon(radii: &[f64]) -> Vec<(f64, f64)> {
    let n = radii.len();
    let mut points: Vec<(f64, f64)> = radii
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let angle = axis_angle(i, n);
            (r * angle.cos(), r * angle.sin())
        })
        .collect();
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

/// Ray casting test; `polygon` may be closed or open.
pub fn point_in_polygon(point: (f64, f64), polygon: &[(f64, f64)]) -> bool {
    let (px, py) = point;
    let mut inside = false;
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Grid points inside the polygon, used to paint the fill.
pub fn fill_points(polygon: &[(f64, f64)], x_step: f64, y_step: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    if x_step <= 0.0 || y_step <= 0.0 {
        return points;
    }
    let mut y = -MAX_RADIUS;
    while y <= MAX_RADIUS {
        let mut x = -MAX_RADIUS;
        while x <= MAX_RADIUS {
            if point_in_polygon((x, y), polygon) {
                points.push((x, y));
            }
            x += x_step;
        }
        y += y_step;
    }
    points
}

/// Filled radar polygon over the outcome scores, with a 1-5 web behind it.
pub struct RadarChart<'a> {
    outcomes: &'a [OutcomeScore],
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> RadarChart<'a> {
    pub fn new(outcomes: &'a [OutcomeScore], theme: &'a ThemeColors) -> Self {
        Self {
            outcomes,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

fn draw_path(ctx: &mut Context, path: &[(f64, f64)], color: Color) {
    for pair in path.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
    }
}

impl Widget for RadarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // A cell is roughly twice as tall as it is wide
        let half_width =
            (HALF_HEIGHT * inner.width as f64 / (2.0 * inner.height as f64)).max(HALF_HEIGHT);
        let units_per_col = 2.0 * half_width / inner.width as f64;

        let n = self.outcomes.len();
        let scores: Vec<f64> = self.outcomes.iter().map(|o| o.score).collect();
        let polygon = radar_polygon(&scores);
        // Braille cells hold 2x4 dots
        let fill = fill_points(
            &polygon,
            units_per_col / 2.0,
            2.0 * HALF_HEIGHT / (inner.height as f64 * 4.0),
        );
        let rings: Vec<Vec<(f64, f64)>> = (1..=MAX_SCORE)
            .map(|r| radar_polygon(&vec![r as f64; n]))
            .collect();
        let spokes = radar_polygon(&vec![MAX_RADIUS; n]);

        let labels: Vec<(f64, f64, Line<'static>)> = self
            .outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| {
                let name = format!("{} ", outcome.name);
                let score = format!("{:.2}", outcome.score);
                let angle = axis_angle(i, n);
                let (cos, sin) = (angle.cos(), angle.sin());
                let chars = name.chars().count() + score.chars().count();
                let width = chars as f64 * units_per_col;
                let x = if cos < -0.1 {
                    LABEL_RADIUS * cos - width
                } else if cos <= 0.1 {
                    LABEL_RADIUS * cos - width / 2.0
                } else {
                    LABEL_RADIUS * cos
                };
                let x = x.min(half_width - width).max(-half_width);
                let y = (LABEL_RADIUS * sin).clamp(-HALF_HEIGHT, HALF_HEIGHT);
                let line = Line::from(vec![
                    Span::styled(name, Style::default().fg(self.theme.radar_label)),
                    Span::styled(
                        score,
                        Style::default().fg(self.theme.score_color(outcome.score)),
                    ),
                ]);
                (x, y, line)
            })
            .collect();

        let theme = self.theme;
        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-half_width, half_width])
            .y_bounds([-HALF_HEIGHT, HALF_HEIGHT])
            .paint(|ctx| {
                for ring in &rings {
                    draw_path(ctx, ring, theme.radar_grid);
                }
                for &(x, y) in spokes.iter().take(n) {
                    ctx.draw(&CanvasLine::new(0.0, 0.0, x, y, theme.radar_grid));
                }
                ctx.layer();

                ctx.draw(&Points {
                    coords: &fill,
                    color: theme.radar_fill,
                });
                ctx.layer();

                draw_path(ctx, &polygon, theme.radar_outline);
                for (x, y, line) in &labels {
                    ctx.print(*x, *y, line.clone());
                }
            });
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}

/// Render the radar off-screen and return it as plain text lines.
pub fn render_to_text(outcomes: &[OutcomeScore], width: u16, height: u16) -> String {
    let theme = ThemeColors::dark();
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    RadarChart::new(outcomes, &theme)
        .block(Block::bordered().title(super::CHART_TITLE))
        .render(area, &mut buf);

    (0..height)
        .map(|y| {
            let line: String = (0..width)
                .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()))
                .collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
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
    fn test_polygon_is_closed() {
        let polygon = radar_polygon(&[4.0, 3.74, 3.38, 3.0]);
        assert_eq!(polygon.len(), 5);
        assert_eq!(polygon.first(), polygon.last());
    }

    #[test]
    fn test_polygon_radius_matches_score() {
        let scores = [4.0, 3.74, 3.38, 3.0];
        let polygon = radar_polygon(&scores);
        for (i, score) in scores.iter().enumerate() {
            let (x, y) = polygon[i];
            assert!(((x * x + y * y).sqrt() - score).abs() < 1e-9);
        }
        // First axis points straight up
        assert!(polygon[0].0.abs() < 1e-9);
        assert!((polygon[0].1 - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_polygon() {
        assert!(radar_polygon(&[]).is_empty());
    }

    #[test]
    fn test_point_in_polygon() {
        let square = radar_polygon(&[2.0, 2.0, 2.0, 2.0]);
        assert!(point_in_polygon((0.0, 0.0), &square));
        assert!(point_in_polygon((0.5, 0.5), &square));
        assert!(!point_in_polygon((1.9, 1.9), &square));
        assert!(!point_in_polygon((0.0, 0.0), &square[..2]));
    }

    #[test]
    fn test_fill_points_inside_polygon() {
        let polygon = radar_polygon(&[4.0, 3.74, 3.38, 3.0]);
        let fill = fill_points(&polygon, 0.25, 0.25);
        assert!(!fill.is_empty());
        assert!(fill.iter().all(|&p| point_in_polygon(p, &polygon)));
        assert!(fill_points(&polygon, 0.0, 0.25).is_empty());
    }

    #[test]
    fn test_render_to_text_has_title_and_labels() {
        let text = render_to_text(&default_outcomes(), 80, 26);
        assert!(text.contains("Climate Readiness Radar Chart"));
        assert!(text.contains("Climate Tech Maturity 4.00"));
        assert_eq!(text.lines().count(), 26);
    }

    #[test]
    fn test_label_name_and_score_colors() {
        let outcomes = default_outcomes();
        let theme = ThemeColors::dark();
        let area = Rect::new(0, 0, 80, 26);
        let mut buf = Buffer::empty(area);
        RadarChart::new(&outcomes, &theme).render(area, &mut buf);

        let label = "Climate Tech Maturity 4.00";
        let (x, y) = (0..area.height)
            .find_map(|y| {
                let row: String = (0..area.width)
                    .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()))
                    .collect();
                row.chars()
                    .collect::<Vec<_>>()
                    .windows(label.len())
                    .position(|w| w.iter().collect::<String>() == label)
                    .map(|x| (x as u16, y))
            })
            .unwrap();

        let name_cell = buf.cell((x, y)).unwrap();
        assert_eq!(name_cell.fg, theme.radar_label);
        let score_cell = buf.cell((x + "Climate Tech Maturity ".len() as u16, y)).unwrap();
        assert_eq!(score_cell.fg, theme.score_color(4.0));
    }
}
