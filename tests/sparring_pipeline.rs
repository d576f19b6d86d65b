//! Sparring runs feed learning end to end.

use std::{path::Path, sync::Arc};

use nemesis::{
    adapters::InMemoryRepository,
    engine::{DifficultyPolicy, Nemesis},
    learning::{LearningStore, PatternKey},
    pipeline::{
        ChallengerKind, HabitChallenger, MetricsObserver, SparringConfig, SparringPipeline,
        challenger,
    },
    ports::LearningRepository,
    tictactoe::Mark,
};

fn engine(repo: &InMemoryRepository, policy: DifficultyPolicy) -> Nemesis {
    let store = LearningStore::open(Arc::new(repo.clone()), "ai");
    Nemesis::builder(store).seed(42).policy(policy).build().unwrap()
}

#[test]
fn test_habit_is_learned_and_blocked() {
    let repo = InMemoryRepository::new();
    let mut nemesis = engine(&repo, DifficultyPolicy::deterministic());
    let mut habit = HabitChallenger::new("habit", vec![0, 4, 8], Some(1));

    let mut pipeline = SparringPipeline::new(SparringConfig {
        games: 6,
        first: Mark::X,
        alternate_first: true,
    })
    .with_observer(Box::new(MetricsObserver::new()));
    let result = pipeline.run(&mut nemesis, &mut habit).unwrap();

    assert_eq!(result.total_games, 6);
    assert!(result.learned_patterns > 0);
    assert!(result.blocked_patterns > 0);

    let persisted = repo.load(Path::new("ai")).unwrap();
    assert_eq!(persisted.stats.total(), 6);
    assert_eq!(persisted.book.len(), result.learned_patterns);
    assert!(
        persisted
            .book
            .patterns()
            .all(|(key, entry)| key.moves()[0] == 0 && entry.players.contains("habit"))
    );
}

#[test]
fn test_every_challenger_kind_completes() {
    for name in ["random", "optimal", "habit"] {
        let kind: ChallengerKind = name.parse().unwrap();
        let repo = InMemoryRepository::new();
        let mut nemesis = engine(&repo, DifficultyPolicy::default());
        let mut opponent = challenger(kind, Some(9));

        let mut pipeline = SparringPipeline::new(SparringConfig {
            games: 10,
            ..SparringConfig::default()
        });
        let result = pipeline.run(&mut nemesis, opponent.as_mut()).unwrap();

        assert_eq!(result.wins + result.draws + result.losses, 10);
        assert!((0.0..=100.0).contains(&result.win_rate));
        assert!(result.adaptation_level <= 100);
        assert!(nemesis.store().book().len() >= 1);
    }
}

#[test]
fn test_learning_is_attributed_to_challenger() {
    let repo = InMemoryRepository::new();
    let mut nemesis = engine(&repo, DifficultyPolicy::deterministic());
    let mut opponent = challenger(ChallengerKind::Random, Some(3));

    SparringPipeline::new(SparringConfig {
        games: 4,
        first: Mark::O,
        alternate_first: false,
    })
    .run(&mut nemesis, opponent.as_mut())
    .unwrap();

    let report = nemesis.stats_report();
    assert_eq!(report.total_games, 4);
    assert!(report.patterns.iter().all(|p| p.players == vec!["random".to_string()]));
    assert!(report.recent_moves.len() <= 10);
    assert!(
        report
            .patterns
            .iter()
            .all(|p| p.key == PatternKey::new(&p.moves).unwrap())
    );
}
