mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

use klaw::alphabet::{full_alphabet, LetterPool, ALPHABET_SIZE};
use klaw::audio::TerminalBell;
use klaw::config::{Config, ConfigStore, FileConfigStore};
use klaw::game::{Direction, Game};
use klaw::runtime::{ClawEvent, CrosstermEventSource, FixedTicker, Runner};
use klaw::session::GameSettings;
use klaw::speech::{CommandSpeech, NullSpeech, SpeechSynth};
use klaw::TICK_RATE_MS;

/// Round durations offered on the time screen, in seconds.
pub const TIME_OPTIONS: [u32; 4] = [30, 60, 90, 120];

/// Ticks a move key stays armed after its last key event. Terminals have no
/// key-up, so key repeat keeps re-arming this and release falls out of it.
const MOVE_HOLD_TICKS: u8 = 2;

/// arcade claw machine for letter recognition practice
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A claw-machine TUI for letter recognition practice: pick a letter pool, listen for the spoken target, steer the claw and catch the right capsule before time runs out."
)]
pub struct Cli {
    /// round duration in seconds; skips the duration screen
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// capsules in the machine each round (2-10)
    #[clap(short = 'c', long)]
    capsules: Option<usize>,

    /// seed the random source for a reproducible game
    #[clap(long)]
    seed: Option<u64>,

    /// preselect the letter pool, e.g. --letters abc
    #[clap(short = 'l', long)]
    letters: Option<String>,

    /// start with audio cues muted
    #[clap(long)]
    mute: bool,

    /// disable spoken targets even when a speech command is installed
    #[clap(long)]
    no_speech: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    LetterSelect,
    TimeSelect,
    Playing,
    Result,
    CatchStats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortBy {
    Letter,
    Attempts,
    WinRate,
    WrongGrabs,
}

#[derive(Debug)]
pub struct CatchStatsState {
    pub scroll_offset: usize,
    pub sort_by: SortBy,
    pub sort_ascending: bool,
}

impl Default for CatchStatsState {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            sort_by: SortBy::Letter,
            sort_ascending: true,
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub game: Game,
    pub grid_cursor: usize,
    pub time_cursor: usize,
    pub warning: Option<String>,
    pub catch_stats_state: CatchStatsState,
    pub last_duration_secs: u32,
    pub muted: bool,
    move_hold: u8,
    forced_duration: Option<u32>,
    config_store: FileConfigStore,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        let config_store = FileConfigStore::new();
        let config = config_store.load();

        let pool = match &cli.letters {
            Some(letters) => LetterPool::from_letters(letters),
            None => config.pool(),
        };
        let muted = cli.mute || config.muted;
        let capsule_count = cli.capsules.unwrap_or(config.capsule_count).clamp(2, 10);
        let last_duration_secs = cli.seconds.unwrap_or(config.last_duration_secs);

        let settings = GameSettings {
            duration_secs: last_duration_secs,
            capsule_count,
            seed: cli.seed,
        };
        let speech: Box<dyn SpeechSynth> = if cli.no_speech {
            Box::new(NullSpeech)
        } else {
            match CommandSpeech::detect() {
                Some(synth) => Box::new(synth),
                None => Box::new(NullSpeech),
            }
        };
        let mut game = Game::new(settings, Box::new(TerminalBell::new(muted)), speech);
        game.pool = pool;

        let time_cursor = TIME_OPTIONS
            .iter()
            .position(|s| *s == last_duration_secs)
            .unwrap_or(1);

        Self {
            screen: Screen::LetterSelect,
            game,
            grid_cursor: 0,
            time_cursor,
            warning: None,
            catch_stats_state: CatchStatsState::default(),
            last_duration_secs,
            muted,
            move_hold: 0,
            forced_duration: cli.seconds,
            config_store,
        }
    }

    fn save_config(&self) {
        let mut cfg = Config {
            selected_letters: String::new(),
            last_duration_secs: self.last_duration_secs,
            capsule_count: self.game.settings.capsule_count,
            muted: self.muted,
        };
        cfg.set_pool(&self.game.pool);
        let _ = self.config_store.save(&cfg);
    }

    fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.game.set_muted(self.muted);
        self.save_config();
    }

    fn begin_game(&mut self, duration_secs: u32) {
        self.last_duration_secs = duration_secs;
        self.save_config();
        self.game.start(duration_secs);
        self.screen = Screen::Playing;
    }

    /// Move from the letter grid toward a round, blocking on an empty pool.
    fn confirm_letters(&mut self) {
        if self.game.pool.is_empty() {
            self.warning = Some("Please select at least one letter!".to_string());
            return;
        }
        self.warning = None;
        match self.forced_duration {
            Some(secs) => self.begin_game(secs),
            None => self.screen = Screen::TimeSelect,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli);
    let res = start_tui(&mut terminal, &mut app);

    app.save_config();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step() {
            ClawEvent::Tick => {
                if app.screen == Screen::Playing {
                    if app.move_hold > 0 {
                        app.move_hold -= 1;
                        if app.move_hold == 0 {
                            app.game.stop_move();
                        }
                    }
                    app.game.on_tick();
                    if app.game.is_over() {
                        app.screen = Screen::Result;
                    }
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            ClawEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            ClawEvent::Key(key) => {
                if handle_key(app, key) == KeyOutcome::Quit {
                    break;
                }
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum KeyOutcome {
    Continue,
    Quit,
}

fn handle_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    // ctrl+c quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    match app.screen {
        Screen::LetterSelect => letter_select_key(app, key),
        Screen::TimeSelect => time_select_key(app, key),
        Screen::Playing => playing_key(app, key),
        Screen::Result => result_key(app, key),
        Screen::CatchStats => catch_stats_key(app, key),
    }
}

fn letter_select_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Left => {
            app.grid_cursor = (app.grid_cursor + ALPHABET_SIZE - 1) % ALPHABET_SIZE;
        }
        KeyCode::Right => {
            app.grid_cursor = (app.grid_cursor + 1) % ALPHABET_SIZE;
        }
        KeyCode::Up => {
            app.grid_cursor = app.grid_cursor.saturating_sub(ui::LETTERS_PER_ROW);
        }
        KeyCode::Down => {
            if app.grid_cursor + ui::LETTERS_PER_ROW < ALPHABET_SIZE {
                app.grid_cursor += ui::LETTERS_PER_ROW;
            }
        }
        KeyCode::Char(' ') => {
            let token = full_alphabet()[app.grid_cursor];
            app.game.toggle_letter(token);
            app.warning = None;
        }
        KeyCode::Char('a') => app.game.select_all_letters(true),
        KeyCode::Char('n') => app.game.select_all_letters(false),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Enter => app.confirm_letters(),
        _ => {}
    }
    KeyOutcome::Continue
}

fn time_select_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => app.screen = Screen::LetterSelect,
        KeyCode::Up => app.time_cursor = app.time_cursor.saturating_sub(1),
        KeyCode::Down => {
            app.time_cursor = (app.time_cursor + 1).min(TIME_OPTIONS.len() - 1);
        }
        KeyCode::Enter => app.begin_game(TIME_OPTIONS[app.time_cursor]),
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            app.time_cursor = idx;
            app.begin_game(TIME_OPTIONS[idx]);
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn playing_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => {
            app.game.return_to_menu();
            app.save_config();
            app.screen = Screen::LetterSelect;
        }
        KeyCode::Left => {
            app.game.start_move(Direction::Left);
            app.move_hold = MOVE_HOLD_TICKS;
        }
        KeyCode::Right => {
            app.game.start_move(Direction::Right);
            app.move_hold = MOVE_HOLD_TICKS;
        }
        KeyCode::Char(' ') | KeyCode::Down => app.game.request_catch(),
        KeyCode::Char('l') => app.game.listen(),
        KeyCode::Char('m') => app.toggle_mute(),
        _ => {}
    }
    KeyOutcome::Continue
}

fn result_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('r') | KeyCode::Enter => app.begin_game(app.last_duration_secs),
        KeyCode::Char('n') => {
            app.screen = Screen::LetterSelect;
        }
        KeyCode::Char('s') => {
            app.catch_stats_state = CatchStatsState::default();
            app.screen = Screen::CatchStats;
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn catch_stats_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('b') | KeyCode::Backspace => app.screen = Screen::Result,
        KeyCode::Char('r') => app.begin_game(app.last_duration_secs),
        KeyCode::Up => {
            app.catch_stats_state.scroll_offset =
                app.catch_stats_state.scroll_offset.saturating_sub(1);
        }
        KeyCode::Down => {
            // clamped against the table height in the render function
            app.catch_stats_state.scroll_offset += 1;
        }
        KeyCode::PageUp => {
            app.catch_stats_state.scroll_offset =
                app.catch_stats_state.scroll_offset.saturating_sub(10);
        }
        KeyCode::PageDown => app.catch_stats_state.scroll_offset += 10,
        KeyCode::Home => app.catch_stats_state.scroll_offset = 0,
        KeyCode::Char('1') => {
            app.catch_stats_state.sort_by = SortBy::Letter;
            app.catch_stats_state.scroll_offset = 0;
        }
        KeyCode::Char('2') => {
            app.catch_stats_state.sort_by = SortBy::Attempts;
            app.catch_stats_state.scroll_offset = 0;
        }
        KeyCode::Char('3') => {
            app.catch_stats_state.sort_by = SortBy::WinRate;
            app.catch_stats_state.scroll_offset = 0;
        }
        KeyCode::Char('4') => {
            app.catch_stats_state.sort_by = SortBy::WrongGrabs;
            app.catch_stats_state.scroll_offset = 0;
        }
        KeyCode::Char(' ') => {
            app.catch_stats_state.sort_ascending = !app.catch_stats_state.sort_ascending;
            app.catch_stats_state.scroll_offset = 0;
        }
        _ => {}
    }
    KeyOutcome::Continue
}
