#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level objectives that grade a run from the world-state notifications.
//!
//! Objectives subscribe to [`NotificationKind::WorldState`] and keep the
//! latest figures they care about. Ranking is pure and may be queried at any
//! point, although it is only meaningful once the level is done.

use revert_core::{Notification, NotificationKind, Subscriber};

/// Notification kinds objectives observe.
pub const OBJECTIVE_KINDS: [NotificationKind; 1] = [NotificationKind::WorldState];

/// Grade awarded for an objective, best first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    /// Target met or beaten.
    S,
    /// At least 80% of the target.
    A,
    /// At least 60% of the target.
    B,
    /// At least 40% of the target.
    C,
    /// At least 20% of the target.
    D,
    /// Anything less.
    F,
}

impl Rank {
    /// Every rank, best first.
    pub const ALL: [Self; 6] = [Self::S, Self::A, Self::B, Self::C, Self::D, Self::F];

    /// Grades the achieved share of a target. Non-finite ratios grade as `F`.
    #[must_use]
    pub fn from_ratio(ratio: f32) -> Self {
        if !ratio.is_finite() {
            return Self::F;
        }
        match ratio {
            r if r >= 1.0 => Self::S,
            r if r >= 0.8 => Self::A,
            r if r >= 0.6 => Self::B,
            r if r >= 0.4 => Self::C,
            r if r >= 0.2 => Self::D,
            _ => Self::F,
        }
    }

    /// Share of the full bonus the rank earns, in percent.
    #[must_use]
    pub const fn bonus_percent(self) -> u64 {
        match self {
            Self::S => 100,
            Self::A => 80,
            Self::B => 60,
            Self::C => 40,
            Self::D => 20,
            Self::F => 0,
        }
    }

    /// Single letter label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

/// Goal the player is graded against when a level finishes.
pub trait Objective: Subscriber {
    /// Rank earned so far.
    fn rank(&self) -> Rank;

    /// Bonus score earned so far.
    fn bonus(&self) -> u64;

    /// Prompt shown before the level starts.
    fn message(&self) -> String;
}

/// Objective to reach a target score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreObjective {
    target: u64,
    reward: u64,
    score: u64,
}

impl ScoreObjective {
    /// Creates an objective awarding up to `reward` for reaching `target` points.
    #[must_use]
    pub const fn new(target: u64, reward: u64) -> Self {
        Self {
            target,
            reward,
            score: 0,
        }
    }

    /// Latest observed score.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }
}

impl Subscriber for ScoreObjective {
    fn notify(&mut self, notification: &Notification) {
        if let Notification::WorldState { score, .. } = notification {
            self.score = *score;
        }
    }
}

impl Objective for ScoreObjective {
    fn rank(&self) -> Rank {
        if self.target == 0 {
            return Rank::S;
        }
        Rank::from_ratio(self.score as f32 / self.target as f32)
    }

    fn bonus(&self) -> u64 {
        self.reward * self.rank().bonus_percent() / 100
    }

    fn message(&self) -> String {
        format!("Score at least {} points", self.target)
    }
}

/// Objective to reach the final wave within a time limit.
///
/// The world's time bonus is the reward; the rank compares the limit with
/// the elapsed time of the first world state reported once the final wave
/// has started. Later states are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeObjective {
    limit: f32,
    time: f32,
    time_bonus: u64,
    finished: bool,
}

impl TimeObjective {
    /// Creates an objective with a limit in the world's time units.
    #[must_use]
    pub const fn new(limit: f32) -> Self {
        Self {
            limit,
            time: 0.0,
            time_bonus: 0,
            finished: false,
        }
    }

    /// Whether the final wave has been reached.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.finished
    }

    /// Latest observed elapsed time.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }
}

impl Subscriber for TimeObjective {
    fn notify(&mut self, notification: &Notification) {
        if self.finished {
            return;
        }
        if let Notification::WorldState {
            time,
            time_bonus,
            wave,
            total_waves,
            ..
        } = notification
        {
            self.time = *time;
            self.time_bonus = *time_bonus;
            self.finished = *total_waves > 0 && wave == total_waves;
        }
    }
}

impl Objective for TimeObjective {
    fn rank(&self) -> Rank {
        if !self.finished {
            return Rank::F;
        }
        if self.time <= 0.0 {
            return Rank::S;
        }
        Rank::from_ratio(self.limit / self.time)
    }

    fn bonus(&self) -> u64 {
        if self.finished {
            self.time_bonus
        } else {
            0
        }
    }

    fn message(&self) -> String {
        format!("Reach the final wave within {:.0} time units", self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_grade_into_bands() {
        assert_eq!(Rank::from_ratio(1.5), Rank::S);
        assert_eq!(Rank::from_ratio(1.0), Rank::S);
        assert_eq!(Rank::from_ratio(0.85), Rank::A);
        assert_eq!(Rank::from_ratio(0.6), Rank::B);
        assert_eq!(Rank::from_ratio(0.45), Rank::C);
        assert_eq!(Rank::from_ratio(0.2), Rank::D);
        assert_eq!(Rank::from_ratio(0.1), Rank::F);
        assert_eq!(Rank::from_ratio(f32::NAN), Rank::F);
        assert_eq!(Rank::from_ratio(f32::INFINITY), Rank::F);
    }

    #[test]
    fn ranks_order_best_first() {
        let mut sorted = Rank::ALL;
        sorted.sort();
        assert_eq!(sorted, Rank::ALL);
        assert!(Rank::S < Rank::F);
        assert_eq!(Rank::ALL.map(Rank::label).concat(), "SABCDF");
    }

    #[test]
    fn zero_score_target_is_always_met() {
        let objective = ScoreObjective::new(0, 100);
        assert_eq!(objective.rank(), Rank::S);
        assert_eq!(objective.bonus(), 100);
    }
}
