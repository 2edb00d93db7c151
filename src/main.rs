use std::fs::File;
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pacman_arcade::clock::SystemClock;
use pacman_arcade::config::{build_roster, Config};
use pacman_arcade::constants::SpawnLayout;
use pacman_arcade::direction::Dir;
use pacman_arcade::terminal::TerminalDisplay;
use pacman_arcade::{Game, GameError, Input};

const INPUT_HOLD_MS: u64 = 160;

fn main() -> Result<(), GameError> {
    let config = Config::parse();
    init_tracing(config.log_file.as_deref())?;

    let seed = config.seed.unwrap_or_else(rand::random);
    let roster = build_roster(&SpawnLayout::default(), config.ghosts, seed);
    let mut game = Game::new(
        SystemClock::new(),
        config.level_source(),
        roster.player,
        roster.ghosts,
    )?;
    info!(seed, fps = config.fps, ghosts = config.ghosts, "starting");

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut game, config.frame_time());

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    info!(
        score = game.session().score(),
        high_score = game.session().high_score(),
        "quit"
    );
    result.map_err(GameError::from)
}

// The screen belongs to the game, so logs only go to a file.
fn init_tracing(path: Option<&Path>) -> Result<(), GameError> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| GameError::Logging(err.to_string()))
}

fn run(stdout: &mut Stdout, game: &mut Game<SystemClock>, frame_time: Duration) -> io::Result<()> {
    let mut display = TerminalDisplay::new(stdout, game.map().width(), game.map().height());
    let mut held = HeldDirs::default();
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let mut input = Input::default();
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            let pressed = key.kind == KeyEventKind::Press;
            if !pressed && key.kind != KeyEventKind::Repeat {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('5') | KeyCode::Char('+') | KeyCode::Char('c') if pressed => {
                    input.credit = true
                }
                KeyCode::Char('1') | KeyCode::Enter if pressed => input.start = true,
                KeyCode::Char(' ') | KeyCode::Char('p') if pressed => input.pause = true,
                code => {
                    if let Some(dir) = dir_for_key(code) {
                        held.press(dir, Instant::now());
                    }
                }
            }
        }
        input.steer = held.active(Instant::now());

        let dt = last_frame.elapsed().as_secs_f64();
        last_frame = Instant::now();
        game.tick(input, dt);

        display.set_board_size(game.map().width(), game.map().height());
        let (term_w, term_h) = terminal::size()?;
        if display.fit(term_w, term_h)? {
            game.request_full_redraw();
        }
        game.render(&mut display)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Dir::Right),
        _ => None,
    }
}

/// Terminals report key presses, not releases, so a direction counts as held
/// for a short window after its last press or repeat.
#[derive(Debug, Default)]
struct HeldDirs {
    last_seen: [Option<Instant>; 4],
    last_pressed: Option<Dir>,
}

impl HeldDirs {
    fn press(&mut self, dir: Dir, at: Instant) {
        self.last_seen[idx_for_dir(dir)] = Some(at);
        self.last_pressed = Some(dir);
    }

    fn active(&self, now: Instant) -> Option<Dir> {
        let hold = Duration::from_millis(INPUT_HOLD_MS);
        let fresh = |t: Instant| now.saturating_duration_since(t) <= hold;

        if let Some(dir) = self.last_pressed {
            if self.last_seen[idx_for_dir(dir)].is_some_and(fresh) {
                return Some(dir);
            }
        }
        Dir::ALL
            .into_iter()
            .filter_map(|dir| {
                self.last_seen[idx_for_dir(dir)]
                    .filter(|t| fresh(*t))
                    .map(|t| (dir, t))
            })
            .max_by_key(|(_, t)| *t)
            .map(|(dir, _)| dir)
    }
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}
