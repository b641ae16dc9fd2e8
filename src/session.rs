use crate::alphabet::Token;
use crate::round::{Capsule, DEFAULT_CAPSULE_COUNT};
use crate::score::ScoreKeeper;

/// Leftmost claw position, in percent of the play area.
pub const CLAW_MIN_X: f64 = 6.0;
/// Rightmost claw position.
pub const CLAW_MAX_X: f64 = 94.0;
/// Claw start position at the beginning of a game.
pub const CLAW_HOME_X: f64 = 50.0;
/// Horizontal claw travel per tick while a move key is held.
pub const CLAW_SPEED: f64 = 3.6;

/// Knobs fixed before a game starts.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub duration_secs: u32,
    pub capsule_count: usize,
    /// Seed for every random draw (selection, jitter, win rolls). `None`
    /// seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            capsule_count: DEFAULT_CAPSULE_COUNT,
            seed: None,
        }
    }
}

/// Mutable state of one game, reset on every start.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub score: ScoreKeeper,
    pub time_remaining: u32,
    pub is_playing: bool,
    pub claw_position: f64,
}

impl GameSession {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            score: ScoreKeeper::new(),
            time_remaining: duration_secs,
            is_playing: true,
            claw_position: CLAW_HOME_X,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            score: ScoreKeeper::new(),
            time_remaining: 0,
            is_playing: false,
            claw_position: CLAW_HOME_X,
        }
    }
}

/// State of the round currently in the machine. Recreated by the selector
/// each round, discarded when the round advances.
#[derive(Clone, Debug)]
pub struct RoundState {
    pub target: Token,
    pub capsules: Vec<Capsule>,
    /// 1-based after the first resolved catch; an empty grab does not count.
    pub attempts_on_target: u32,
}

impl RoundState {
    pub fn new(target: Token, capsules: Vec<Capsule>) -> Self {
        Self {
            target,
            capsules,
            attempts_on_target: 0,
        }
    }
}
