use crate::alphabet::{full_alphabet, LetterPool, Token, ALPHABET_SIZE};
use rand::seq::SliceRandom;
use rand::Rng;

/// How many capsules sit in the machine each round (target + decoys).
pub const DEFAULT_CAPSULE_COUNT: usize = 5;

/// Left edge of the first placement section, in percent of the play area.
pub const PLACEMENT_START_X: f64 = 22.0;
/// Right edge of the placement band.
pub const PLACEMENT_END_X: f64 = 95.0;
/// Hard left bound after jitter.
pub const PLACEMENT_MIN_X: f64 = 20.0;
/// Uniform jitter applied to each section start, in percent.
pub const PLACEMENT_JITTER: f64 = 2.0;

/// One capsule sitting in the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub token: Token,
    /// Horizontal position in percent of the play area width.
    pub position_x: f64,
    /// Display hue in degrees, presentation-only.
    pub hue: u16,
}

/// The tokens and placements for one round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundPlan {
    pub target: Token,
    pub capsules: Vec<Capsule>,
}

/// Picks the next target and its decoys.
///
/// Remembers the previous target so the same letter is never spoken twice in
/// a row (unless the pool has a single token, where exclusion would starve
/// selection).
#[derive(Clone, Debug, Default)]
pub struct RoundSelector {
    last_target: Option<Token>,
}

impl RoundSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous target. Called when a new game starts.
    pub fn reset(&mut self) {
        self.last_target = None;
    }

    pub fn last_target(&self) -> Option<Token> {
        self.last_target
    }

    /// Assemble the next round from the player's pool.
    ///
    /// An empty pool is repaired to the full alphabet rather than treated as
    /// an error. The target comes from the pool; decoys always sample the
    /// full alphabet so the machine looks full even with a tiny pool.
    pub fn pick_round<R: Rng>(
        &mut self,
        pool: &LetterPool,
        capsule_count: usize,
        rng: &mut R,
    ) -> RoundPlan {
        let pool_tokens = if pool.is_empty() {
            full_alphabet()
        } else {
            pool.tokens()
        };

        let candidates: Vec<Token> = match self.last_target {
            Some(last) if pool_tokens.len() > 1 => {
                pool_tokens.iter().copied().filter(|t| *t != last).collect()
            }
            _ => pool_tokens,
        };

        let target = candidates[rng.gen_range(0..candidates.len())];
        self.last_target = Some(target);

        let alphabet = full_alphabet();
        let mut tokens = vec![target];
        while tokens.len() < capsule_count.min(ALPHABET_SIZE) {
            let decoy = alphabet[rng.gen_range(0..alphabet.len())];
            if decoy != target && !tokens.contains(&decoy) {
                tokens.push(decoy);
            }
        }
        // shuffle so the target has no fixed lane
        tokens.shuffle(rng);

        let capsules = place_capsules(&tokens, rng);
        RoundPlan { target, capsules }
    }
}

/// Spread the tokens over equal sections of the placement band, with a
/// little jitter so rounds do not look gridded.
fn place_capsules<R: Rng>(tokens: &[Token], rng: &mut R) -> Vec<Capsule> {
    let section_width = (PLACEMENT_END_X - PLACEMENT_START_X) / tokens.len() as f64;

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let base_x = PLACEMENT_START_X + i as f64 * section_width;
            let jitter = rng.gen_range(-PLACEMENT_JITTER..PLACEMENT_JITTER);
            let position_x = (base_x + jitter).max(PLACEMENT_MIN_X);
            let hue = rng.gen_range(0..360);
            Capsule {
                token: *token,
                position_x,
                hue,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn token(letter: char) -> Token {
        Token::from_letter(letter).unwrap()
    }

    #[test]
    fn round_holds_unique_tokens_including_target() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::from_letters("abc");

        for _ in 0..50 {
            let plan = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
            assert_eq!(plan.capsules.len(), DEFAULT_CAPSULE_COUNT);

            let tokens: BTreeSet<Token> = plan.capsules.iter().map(|c| c.token).collect();
            assert_eq!(tokens.len(), DEFAULT_CAPSULE_COUNT, "duplicate capsule token");
            assert!(tokens.contains(&plan.target), "target missing from capsules");
        }
    }

    #[test]
    fn target_always_comes_from_the_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::from_letters("qx");

        for _ in 0..50 {
            let plan = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
            assert!(pool.contains(plan.target));
        }
    }

    #[test]
    fn previous_target_is_excluded_when_pool_allows() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::from_letters("abcde");

        let mut last = None;
        for _ in 0..200 {
            let plan = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
            if let Some(prev) = last {
                assert_ne!(plan.target, prev, "target repeated across rounds");
            }
            last = Some(plan.target);
        }
    }

    #[test]
    fn two_token_pool_alternates_deterministically() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::from_letters("ab");

        let first = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
        let second = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
        assert_ne!(first.target, second.target);

        // with {Aa, Bb} and last target Aa, the next target must be Bb
        if first.target == token('a') {
            assert_eq!(second.target, token('b'));
        } else {
            assert_eq!(second.target, token('a'));
        }
    }

    #[test]
    fn singleton_pool_never_starves() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::from_letters("k");

        for _ in 0..10 {
            let plan = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
            assert_eq!(plan.target, token('k'));
        }
    }

    #[test]
    fn empty_pool_is_repaired_to_full_alphabet() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::new();

        let plan = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
        assert_eq!(plan.capsules.len(), DEFAULT_CAPSULE_COUNT);
    }

    #[test]
    fn decoys_come_from_full_alphabet() {
        // a singleton pool forces every other capsule to be an out-of-pool
        // decoy; this pins the intentional full-alphabet decoy source
        let mut rng = StdRng::seed_from_u64(13);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::from_letters("a");

        let plan = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
        let out_of_pool = plan
            .capsules
            .iter()
            .filter(|c| !pool.contains(c.token))
            .count();
        assert_eq!(out_of_pool, DEFAULT_CAPSULE_COUNT - 1);
    }

    #[test]
    fn placement_respects_bounds_and_sections() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::from_letters("abcdef");

        for _ in 0..50 {
            let plan = selector.pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng);
            let section = (PLACEMENT_END_X - PLACEMENT_START_X) / DEFAULT_CAPSULE_COUNT as f64;

            for (i, capsule) in plan.capsules.iter().enumerate() {
                let base = PLACEMENT_START_X + i as f64 * section;
                assert!(capsule.position_x >= PLACEMENT_MIN_X);
                assert!(capsule.position_x >= base - PLACEMENT_JITTER - 1e-9);
                assert!(capsule.position_x <= base + PLACEMENT_JITTER + 1e-9);
                assert!(capsule.hue < 360);
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_round() {
        let pool = LetterPool::from_letters("abcdefgh");

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let plan_a = RoundSelector::new().pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng_a);
        let plan_b = RoundSelector::new().pick_round(&pool, DEFAULT_CAPSULE_COUNT, &mut rng_b);

        assert_eq!(plan_a, plan_b);
    }

    #[test]
    fn capsule_count_is_capped_by_alphabet() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut selector = RoundSelector::new();
        let pool = LetterPool::from_letters("a");

        let plan = selector.pick_round(&pool, 100, &mut rng);
        assert_eq!(plan.capsules.len(), ALPHABET_SIZE);
    }
}
