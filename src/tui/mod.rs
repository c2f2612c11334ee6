pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::ThemeColors;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(anyhow::Error::from(e));
        }

        match events.next().await {
            Some(Event::Key(key)) => handle_key_event(&mut app, key),
            Some(Event::Tick) => app.update_flash(),
            // Next draw re-checks the chart capability against the new size
            Some(Event::Resize) => {}
            None => break Ok(()),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Driver selection
                KeyCode::Char('j') | KeyCode::Down => app.next_driver(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_driver(),

                // Slider adjustment
                KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') => app.increment_selected(),
                KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => app.decrement_selected(),
                KeyCode::Char(c @ '1'..='5') => app.set_selected(c as i64 - '0' as i64),

                KeyCode::Char('r') => app.reset_all(),
                KeyCode::Char('m') => app.toggle_mode(),
                KeyCode::Char('c') => app.toggle_chart(),

                // Outcome selection and breakdown
                KeyCode::Tab => app.next_outcome(),
                KeyCode::Char('b') => app.show_score_breakdown(),

                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.dismiss_score_breakdown(),
            KeyCode::Tab => app.next_outcome(),
            KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Catalog, EvaluationMode};

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn new_app() -> App {
        App::new(Catalog::default(), EvaluationMode::InputsOnly, true, false)
    }

    #[test]
    fn test_keys_adjust_selected_driver() {
        let mut app = new_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.selected_driver(), Some(("R&D Investment", 2)));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.selected_driver(), Some(("R&D Investment", 4)));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected_driver(), Some(("R&D Investment", 3)));
    }

    #[test]
    fn test_number_keys_outside_range_ignored() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.selected_driver(), Some(("Leadership Commitment", 5)));
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, app::InputMode::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.input_mode, app::InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_breakdown_popup_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.input_mode, app::InputMode::ScoreBreakdown);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selected_outcome, 1);
        // Slider keys are inert while the popup is open
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.selected_driver(), Some(("Leadership Commitment", 5)));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
        assert!(app.chart_enabled);

        let mut app2 = new_app();
        press(&mut app2, KeyCode::Char('q'));
        assert!(app2.should_quit);
    }
}
