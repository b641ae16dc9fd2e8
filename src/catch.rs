use crate::alphabet::Token;
use crate::round::Capsule;

/// Maximum horizontal distance between claw and capsule that still grabs.
pub const CATCH_RADIUS: f64 = 9.0;

/// Points for a win on attempt 1, 2, and 3-or-later.
pub const WIN_POINTS: [i32; 3] = [500, 300, 100];

/// Score delta for grabbing the wrong capsule.
pub const WRONG_GRAB_PENALTY: i32 = -20;

/// Win probability for the given 1-based attempt on the true target.
///
/// The ramp is a pity mechanic: a third catch of the right capsule always
/// succeeds.
pub fn win_probability(attempt: u32) -> f64 {
    match attempt {
        0 | 1 => 0.6,
        2 => 0.8,
        _ => 1.0,
    }
}

/// Points awarded for a win on the given 1-based attempt.
pub fn win_points(attempt: u32) -> i32 {
    match attempt {
        0 | 1 => WIN_POINTS[0],
        2 => WIN_POINTS[1],
        _ => WIN_POINTS[2],
    }
}

/// Which capsule, if any, the claw closes around.
///
/// The candidate is the capsule nearest the claw, accepted only when its
/// distance is strictly under [`CATCH_RADIUS`]. On an exact distance tie the
/// earliest capsule in the slice wins; the strict `<` below is what keeps
/// that ordering stable.
pub fn resolve_catch(claw_position: f64, capsules: &[Capsule]) -> Option<usize> {
    let mut caught = None;
    let mut min_diff = CATCH_RADIUS;
    for (i, capsule) in capsules.iter().enumerate() {
        let diff = (capsule.position_x - claw_position).abs();
        if diff < min_diff {
            min_diff = diff;
            caught = Some(i);
        }
    }
    caught
}

/// Outcome of one resolved catch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatchOutcome {
    /// Right capsule, roll under the attempt's win probability.
    Win { points: i32 },
    /// Right capsule, but the claw slipped. Feedback only, no score change.
    NearMiss,
    /// Wrong capsule. Deterministic loss with a score penalty.
    WrongGrab { penalty: i32 },
}

impl CatchOutcome {
    pub fn score_delta(&self) -> i32 {
        match self {
            CatchOutcome::Win { points } => *points,
            CatchOutcome::NearMiss => 0,
            CatchOutcome::WrongGrab { penalty } => *penalty,
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, CatchOutcome::Win { .. })
    }
}

/// Decide win/lose for a caught capsule.
///
/// `attempt` is the 1-based count of resolved catches on the current target,
/// including this one. `roll` is one uniform draw in [0, 1); the caller
/// draws it from the game RNG so this stays a pure function.
pub fn resolve_outcome(caught: Token, target: Token, attempt: u32, roll: f64) -> CatchOutcome {
    if caught != target {
        return CatchOutcome::WrongGrab {
            penalty: WRONG_GRAB_PENALTY,
        };
    }

    if roll < win_probability(attempt) {
        CatchOutcome::Win {
            points: win_points(attempt),
        }
    } else {
        CatchOutcome::NearMiss
    }
}
