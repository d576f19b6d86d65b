//! Builder for [`Nemesis`] construction

use std::collections::VecDeque;

use rand::{SeedableRng, rngs::StdRng};

use super::{
    adaptation::DifficultyPolicy,
    agent::{MOVE_LOG_CAPACITY, Nemesis},
    selector::MoveSelector,
};
use crate::{Error, Result, learning::LearningStore, tictactoe::Mark};

/// Fluent configuration for a [`Nemesis`] engine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use nemesis::adapters::InMemoryRepository;
/// use nemesis::engine::{DifficultyPolicy, NemesisBuilder};
/// use nemesis::learning::LearningStore;
/// use nemesis::tictactoe::Mark;
///
/// let store = LearningStore::open(Arc::new(InMemoryRepository::new()), "ai");
/// let engine = NemesisBuilder::new(store)
///     .ai(Mark::O)
///     .seed(42)
///     .policy(DifficultyPolicy::deterministic())
///     .build()?;
/// # Ok::<(), nemesis::Error>(())
/// ```
#[derive(Debug)]
pub struct NemesisBuilder {
    store: LearningStore,
    ai: Mark,
    seed: Option<u64>,
    policy: DifficultyPolicy,
    avoid_last_losing_move: bool,
    move_log_capacity: usize,
}

impl NemesisBuilder {
    /// Defaults: engine plays `O`, OS-seeded RNG, default policy, losing-move
    /// avoidance on, 1000-move log.
    pub fn new(store: LearningStore) -> Self {
        NemesisBuilder {
            store,
            ai: Mark::O,
            seed: None,
            policy: DifficultyPolicy::default(),
            avoid_last_losing_move: true,
            move_log_capacity: MOVE_LOG_CAPACITY,
        }
    }

    /// Set which mark the engine plays.
    pub fn ai(mut self, mark: Mark) -> Self {
        self.ai = mark;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn policy(mut self, policy: DifficultyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn avoid_last_losing_move(mut self, enabled: bool) -> Self {
        self.avoid_last_losing_move = enabled;
        self
    }

    pub fn move_log_capacity(mut self, capacity: usize) -> Self {
        self.move_log_capacity = capacity;
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an out-of-range policy or
    /// a zero-length move log.
    pub fn build(self) -> Result<Nemesis> {
        self.policy.validate()?;
        if self.move_log_capacity == 0 {
            return Err(Error::InvalidConfiguration {
                message: "move log capacity must be at least 1".to_string(),
            });
        }

        let rng = match self.seed {
            Some(value) => StdRng::seed_from_u64(value),
            None => StdRng::seed_from_u64(rand::random::<u64>()),
        };

        Ok(Nemesis {
            store: self.store,
            selector: MoveSelector::new(self.policy),
            rng,
            ai: self.ai,
            avoid_last_losing_move: self.avoid_last_losing_move,
            last_losing_move: None,
            move_log: VecDeque::new(),
            move_log_capacity: self.move_log_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::InMemoryRepository;

    fn store() -> LearningStore {
        LearningStore::open(Arc::new(InMemoryRepository::new()), "ai")
    }

    #[test]
    fn test_defaults() {
        let engine = NemesisBuilder::new(store()).build().unwrap();
        assert_eq!(engine.ai(), Mark::O);
        assert_eq!(engine.selector().policy(), &DifficultyPolicy::default());
    }

    #[test]
    fn test_rejects_bad_policy() {
        let policy = DifficultyPolicy::default().with_chaos(2.0);
        let err = NemesisBuilder::new(store()).policy(policy).build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_empty_move_log() {
        assert!(
            NemesisBuilder::new(store())
                .move_log_capacity(0)
                .build()
                .is_err()
        );
    }
}
