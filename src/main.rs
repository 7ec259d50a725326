use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ghosttype::{
    app_dirs::AppDirs,
    catalog::Tier,
    config::{Config, ConfigStore, FileConfigStore},
    lifecycle::Font,
    logging,
    runtime::{AppEvent, Pump, TerminalInput},
    App,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};
use tracing::{info, warn};

/// haunted typing practice: timed passages with live accuracy and wpm
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the passage shown before the countdown runs out. Easy, medium and hard tiers give 15, 30 and 60 seconds."
)]
pub struct Cli {
    /// difficulty tier (overrides the saved setting)
    #[clap(short = 't', long, value_enum)]
    tier: Option<Tier>,

    /// font style identifier (overrides the saved setting)
    #[clap(short = 'f', long)]
    font: Option<String>,

    /// path to the config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// CLI flags win over whatever was saved
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(tier) = self.tier {
            cfg.tier = tier;
        }
        if let Some(font) = &self.font {
            cfg.font = Font::new(font.as_str());
        }
        cfg
    }
}

fn load_settings(cli: &Cli) -> ghosttype::error::Result<(FileConfigStore, Config)> {
    let store = cli.config_store();
    let cfg = cli.apply(store.load()?);
    Ok((store, cfg))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_path) = AppDirs::log_path() {
        // a missing log file never stops the game
        let _ = logging::init(&log_path);
    }

    let (store, cfg) = load_settings(&cli)?;
    let mut app = App::from_config(&cfg)?;
    info!(tier = %cfg.tier, font = %cfg.font, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = store.save(&app.config()) {
        warn!(error = %e, "could not save settings");
    }

    Ok(result?)
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> ghosttype::error::Result<()> {
    let mut pump = Pump::new(TerminalInput);

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        let event = pump.next(Instant::now(), app.next_due())?;

        // scheduled work first, so a key that arrived after the deadline sees it
        let now = Instant::now();
        app.poll(now);
        if let AppEvent::Key(key) = event {
            app.handle_key(key, now);
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["ghosttype"]);

        assert_eq!(cli.tier, None);
        assert_eq!(cli.font, None);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_cli_tier() {
        let cli = Cli::parse_from(["ghosttype", "-t", "easy"]);
        assert_eq!(cli.tier, Some(Tier::Easy));

        let cli = Cli::parse_from(["ghosttype", "--tier", "hard"]);
        assert_eq!(cli.tier, Some(Tier::Hard));
    }

    #[test]
    fn test_cli_rejects_unknown_tier() {
        let result = Cli::try_parse_from(["ghosttype", "--tier", "nightmare"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_font_and_config() {
        let cli = Cli::parse_from(["ghosttype", "-f", "creepster", "-c", "/tmp/gt.json"]);
        assert_eq!(cli.font.as_deref(), Some("creepster"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/gt.json")));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["ghosttype", "--tier", "easy", "--font", "plain"]);
        let cfg = cli.apply(Config {
            tier: Tier::Hard,
            font: Font::from("nosifer"),
        });
        assert_eq!(cfg.tier, Tier::Easy);
        assert_eq!(cfg.font.as_str(), "plain");
    }

    #[test]
    fn test_cli_keeps_saved_values_when_absent() {
        let cli = Cli::parse_from(["ghosttype"]);
        let saved = Config {
            tier: Tier::Hard,
            font: Font::from("nosifer"),
        };
        assert_eq!(cli.apply(saved.clone()), saved);
    }

    #[test]
    fn test_load_settings_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "tier": "hard", "font": "nosifer" }"#).unwrap();

        let cli = Cli::parse_from(["ghosttype", "-c", path.to_str().unwrap(), "-f", "plain"]);
        let (store, cfg) = load_settings(&cli).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert_eq!(cfg.tier, Tier::Hard);
        assert_eq!(cfg.font.as_str(), "plain");
    }
}
