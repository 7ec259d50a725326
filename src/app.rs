use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, Rng};
use tracing::debug;

use crate::catalog::PassageCatalog;
use crate::config::Config;
use crate::lifecycle::{Font, InputOutcome, Lifecycle, LifecycleEvent};

/// Font identifiers offered by the font toggle, in cycle order
pub const FONTS: [&str; 4] = ["cinzel", "creepster", "nosifer", "plain"];

/// Terminal front-end state: the lifecycle plus quit handling
#[derive(Debug)]
pub struct App<R: Rng = StdRng> {
    pub lifecycle: Lifecycle<R>,
    pub should_quit: bool,
}

impl App<StdRng> {
    /// Builds the app from saved settings, validating the passage catalog first
    pub fn from_config(cfg: &Config) -> crate::error::Result<Self> {
        let catalog = PassageCatalog::builtin();
        catalog.validate()?;
        Ok(Self::new(Lifecycle::new(catalog, cfg.tier, cfg.font.clone())))
    }
}

impl<R: Rng> App<R> {
    pub fn new(lifecycle: Lifecycle<R>) -> Self {
        Self {
            lifecycle,
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // the key is read against the state after anything already due
        self.lifecycle.catch_up(now);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('n') if ctrl => self.lifecycle.new_text(),
            KeyCode::Char('f') if ctrl => self.cycle_font(),
            KeyCode::Esc => self.lifecycle.cancel(),
            KeyCode::Tab => {
                let next = self.lifecycle.tier().next();
                self.lifecycle.select_tier(next);
            }
            _ if self.lifecycle.retry_prompt_open() => self.answer_prompt(key.code),
            KeyCode::Backspace => {
                let mut text = self.lifecycle.session().input().to_string();
                if text.pop().is_some() {
                    self.forward(&text, now);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                let mut text = self.lifecycle.session().input().to_string();
                text.push(c);
                self.forward(&text, now);
            }
            _ => {}
        }
    }

    fn answer_prompt(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.lifecycle.answer_retry(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.lifecycle.answer_retry(false);
            }
            _ => {}
        }
    }

    fn forward(&mut self, text: &str, now: Instant) {
        if self.lifecycle.on_input(text, now) == InputOutcome::Locked {
            debug!("keystroke dropped, input locked");
        }
    }

    fn cycle_font(&mut self) {
        let current = self.lifecycle.font().as_str();
        let next = FONTS
            .iter()
            .position(|f| *f == current)
            .map(|i| FONTS[(i + 1) % FONTS.len()])
            .unwrap_or(FONTS[0]);
        self.lifecycle.select_font(Font::from(next));
    }

    pub fn poll(&mut self, now: Instant) -> Vec<LifecycleEvent> {
        self.lifecycle.poll(now)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.lifecycle.next_due()
    }

    /// Settings worth remembering for the next run
    pub fn config(&self) -> Config {
        Config {
            tier: self.lifecycle.tier(),
            font: self.lifecycle.font().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Tier;
    use crate::lifecycle::Phase;
    use rand::SeedableRng;
    use std::time::Duration;

    fn test_app(text: &str, tier: Tier) -> App {
        let pool = vec![text.to_string()];
        let catalog = PassageCatalog::new(pool.clone(), pool.clone(), pool).unwrap();
        App::new(Lifecycle::with_rng(
            catalog,
            tier,
            Font::default(),
            StdRng::seed_from_u64(5),
        ))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App, s: &str, now: Instant) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
    }

    #[test]
    fn test_typing_forwards_full_input() {
        let now = Instant::now();
        let mut app = test_app("ghost", Tier::Easy);
        type_str(&mut app, "gho", now);
        assert_eq!(app.lifecycle.session().input(), "gho");
        assert_eq!(app.lifecycle.phase(), Phase::Running);
    }

    #[test]
    fn test_backspace_removes_last_char() {
        let now = Instant::now();
        let mut app = test_app("ghost", Tier::Easy);
        type_str(&mut app, "ghx", now);
        app.handle_key(key(KeyCode::Backspace), now);
        assert_eq!(app.lifecycle.session().input(), "gh");
    }

    #[test]
    fn test_backspace_on_empty_input_does_not_start_timer() {
        let now = Instant::now();
        let mut app = test_app("ghost", Tier::Easy);
        app.handle_key(key(KeyCode::Backspace), now);
        assert_eq!(app.lifecycle.phase(), Phase::Idle);
        assert!(!app.lifecycle.session().typing_started());
    }

    #[test]
    fn test_escape_cancels() {
        let now = Instant::now();
        let mut app = test_app("ghost", Tier::Easy);
        type_str(&mut app, "gh", now);
        app.handle_key(key(KeyCode::Esc), now);
        assert_eq!(app.lifecycle.session().input(), "");
        assert_eq!(app.lifecycle.phase(), Phase::Idle);
    }

    #[test]
    fn test_tab_cycles_tier() {
        let mut app = test_app("ghost", Tier::Easy);
        app.handle_key(key(KeyCode::Tab), Instant::now());
        assert_eq!(app.lifecycle.tier(), Tier::Medium);
        assert_eq!(app.lifecycle.session().time_limit_secs(), 30);
    }

    #[test]
    fn test_ctrl_f_cycles_font() {
        let mut app = test_app("ghost", Tier::Easy);
        app.handle_key(ctrl('f'), Instant::now());
        assert_eq!(app.lifecycle.font().as_str(), "creepster");
        for _ in 0..3 {
            app.handle_key(ctrl('f'), Instant::now());
        }
        assert_eq!(app.lifecycle.font().as_str(), "cinzel");
    }

    #[test]
    fn test_unknown_font_cycles_to_first() {
        let mut app = test_app("ghost", Tier::Easy);
        app.lifecycle.select_font(Font::from("comic"));
        app.handle_key(ctrl('f'), Instant::now());
        assert_eq!(app.lifecycle.font().as_str(), "cinzel");
    }

    #[test]
    fn test_ctrl_c_quits_without_typing() {
        let mut app = test_app("ghost", Tier::Easy);
        app.handle_key(ctrl('c'), Instant::now());
        assert!(app.should_quit);
        assert_eq!(app.lifecycle.session().input(), "");
    }

    #[test]
    fn test_ctrl_n_new_text() {
        let now = Instant::now();
        let mut app = test_app("ghost", Tier::Hard);
        type_str(&mut app, "g", now);
        app.handle_key(ctrl('n'), now);
        assert_eq!(app.lifecycle.session().input(), "");
        assert_eq!(app.lifecycle.tier(), Tier::Hard);
        assert!(app.next_due().is_none());
    }

    #[test]
    fn test_retry_prompt_keys() {
        let t0 = Instant::now();
        let mut app = test_app("a ghostly passage", Tier::Easy);
        type_str(&mut app, "a", t0);
        app.poll(t0 + Duration::from_secs(16));
        assert!(app.lifecycle.retry_prompt_open());

        // ordinary chars are not typed while the prompt is up
        app.handle_key(key(KeyCode::Char('x')), t0 + Duration::from_secs(16));
        assert!(app.lifecycle.retry_prompt_open());
        assert_eq!(app.lifecycle.session().input(), "a");

        app.handle_key(key(KeyCode::Char('n')), t0 + Duration::from_secs(16));
        assert_eq!(app.lifecycle.phase(), Phase::Idle);
        assert_eq!(app.lifecycle.session().input(), "");
    }

    #[test]
    fn test_late_key_lands_in_advanced_session() {
        let t0 = Instant::now();
        let mut app = test_app("ab", Tier::Easy);
        type_str(&mut app, "ab", t0);
        assert_eq!(app.lifecycle.phase(), Phase::Completed);

        // the advance was due a second ago; the key belongs to the next passage
        app.handle_key(key(KeyCode::Char('c')), t0 + Duration::from_secs(2));
        assert_eq!(app.lifecycle.session().input(), "c");
        assert_eq!(app.lifecycle.phase(), Phase::Running);
        assert_eq!(app.poll(t0 + Duration::from_secs(2)), vec![LifecycleEvent::Advanced]);
    }

    #[test]
    fn test_config_reflects_selection() {
        let mut app = test_app("ghost", Tier::Easy);
        app.handle_key(key(KeyCode::Tab), Instant::now());
        app.handle_key(ctrl('f'), Instant::now());
        let cfg = app.config();
        assert_eq!(cfg.tier, Tier::Medium);
        assert_eq!(cfg.font.as_str(), "creepster");
    }

    #[test]
    fn test_from_config() {
        let cfg = Config {
            tier: Tier::Hard,
            font: Font::from("nosifer"),
        };
        let app = App::from_config(&cfg).unwrap();
        assert_eq!(app.lifecycle.tier(), Tier::Hard);
        assert_eq!(app.lifecycle.font().as_str(), "nosifer");
        assert!(!app.should_quit);
    }
}
