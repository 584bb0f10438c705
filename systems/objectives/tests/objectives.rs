use std::sync::{Arc, Mutex};

use revert_core::{Notification, NotificationBus, NotificationKind, Subscriber};
use revert_system_objectives::{Objective, Rank, ScoreObjective, TimeObjective, OBJECTIVE_KINDS};

fn state(score: u64, time: f32, time_bonus: u64, wave: u32) -> Notification {
    Notification::WorldState {
        score,
        time,
        time_bonus,
        wave,
        total_waves: 3,
    }
}

#[test]
fn score_objective_tracks_the_latest_score() {
    let mut objective = ScoreObjective::new(1_000, 5_000);
    assert_eq!(objective.rank(), Rank::F);
    assert_eq!(objective.bonus(), 0);

    objective.notify(&state(300, 1.0, 0, 1));
    assert_eq!(objective.score(), 300);
    assert_eq!(objective.rank(), Rank::D);
    assert_eq!(objective.bonus(), 1_000);

    objective.notify(&state(850, 2.0, 0, 2));
    assert_eq!(objective.rank(), Rank::A);
    assert_eq!(objective.bonus(), 4_000);

    objective.notify(&Notification::PlayerAttack);
    assert_eq!(objective.score(), 850);
    assert!(objective.message().contains("1000"));
}

#[test]
fn time_objective_grades_only_once_the_final_wave_is_reached() {
    let mut objective = TimeObjective::new(60.0);

    objective.notify(&state(0, 10.0, 20_000, 1));
    assert!(!objective.finished());
    assert_eq!(objective.rank(), Rank::F);
    assert_eq!(objective.bonus(), 0);

    objective.notify(&state(0, 75.0, 15_000, 3));
    assert!(objective.finished());
    assert_eq!(objective.rank(), Rank::A);
    assert_eq!(objective.bonus(), 15_000);

    objective.notify(&state(0, 500.0, 0, 3));
    assert!((objective.time() - 75.0).abs() < f32::EPSILON, "frozen once finished");
    assert_eq!(objective.bonus(), 15_000);
}

#[test]
fn objectives_receive_world_state_through_the_bus() {
    let score = Arc::new(Mutex::new(ScoreObjective::new(200, 100)));
    let time = Arc::new(Mutex::new(TimeObjective::new(10.0)));
    let mut bus = NotificationBus::new();
    let _ = bus.subscribe(&OBJECTIVE_KINDS, Arc::clone(&score));
    let _ = bus.subscribe(&OBJECTIVE_KINDS, Arc::clone(&time));

    let started = Notification::WaveStarted {
        wave: 1,
        actors: Vec::new(),
    };
    bus.publish(&started, |_, _| {});
    bus.publish(&state(240, 5.0, 85_000, 3), |_, _| {});

    let score = score.lock().expect("lock");
    let time = time.lock().expect("lock");
    assert_eq!(score.rank(), Rank::S);
    assert_eq!(score.bonus(), 100);
    assert_eq!(time.rank(), Rank::S);
    assert_eq!(time.bonus(), 85_000);
    assert_eq!(OBJECTIVE_KINDS, [NotificationKind::WorldState]);
}
