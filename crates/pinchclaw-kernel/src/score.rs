//! Score accumulation and the session countdown.

use pinchclaw_types::GameStatus;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Receiver of awarded points.  The grab machine only ever adds.
pub trait ScoreSink {
    fn award(&mut self, points: u32);
}

/// Timing and win threshold of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRules {
    /// Length of a session in whole seconds.
    pub duration_secs: u32,
    /// Minimum final score for [`GameStatus::Won`].
    pub win_score: u32,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            win_score: 500,
        }
    }
}

/// Score, remaining time and status of the current session.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    rules: SessionRules,
    score: u32,
    time_left: u32,
    status: GameStatus,
}

impl Scoreboard {
    pub fn new(rules: SessionRules) -> Self {
        Self {
            rules,
            score: 0,
            time_left: rules.duration_secs,
            status: GameStatus::Start,
        }
    }

    /// Zero the score, refill the clock and enter [`GameStatus::Playing`].
    pub fn start(&mut self) {
        self.score = 0;
        self.time_left = self.rules.duration_secs;
        self.status = GameStatus::Playing;
    }

    /// Count down one second.
    ///
    /// Returns the final status when this tick ended the game.  Does nothing
    /// outside [`GameStatus::Playing`].
    pub fn tick_second(&mut self) -> Option<GameStatus> {
        if self.status != GameStatus::Playing {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            return Some(self.finish());
        }
        None
    }

    /// End the game now and decide the outcome.  Idempotent once finished.
    pub fn finish(&mut self) -> GameStatus {
        if self.status == GameStatus::Playing {
            self.status = if self.score >= self.rules.win_score {
                GameStatus::Won
            } else {
                GameStatus::Lost
            };
            info!(score = self.score, status = %self.status, "game finished");
        }
        self.status
    }

    /// Back to the pre-game state.
    pub fn reset(&mut self) {
        self.score = 0;
        self.time_left = self.rules.duration_secs;
        self.status = GameStatus::Start;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn rules(&self) -> SessionRules {
        self.rules
    }
}

impl ScoreSink for Scoreboard {
    fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_rules() -> SessionRules {
        SessionRules {
            duration_secs: 3,
            win_score: 200,
        }
    }

    #[test]
    fn start_resets_score_and_clock() {
        let mut board = Scoreboard::new(short_rules());
        assert_eq!(board.status(), GameStatus::Start);
        board.start();
        board.award(100);
        board.tick_second();
        board.start();
        assert_eq!(board.score(), 0);
        assert_eq!(board.time_left(), 3);
        assert!(board.is_playing());
    }

    #[test]
    fn countdown_expiry_below_threshold_loses() {
        let mut board = Scoreboard::new(short_rules());
        board.start();
        board.award(100);
        assert_eq!(board.tick_second(), None);
        assert_eq!(board.tick_second(), None);
        assert_eq!(board.tick_second(), Some(GameStatus::Lost));
        assert_eq!(board.time_left(), 0);
        // Further ticks are ignored.
        assert_eq!(board.tick_second(), None);
    }

    #[test]
    fn reaching_threshold_wins() {
        let mut board = Scoreboard::new(short_rules());
        board.start();
        board.award(100);
        board.award(100);
        assert_eq!(board.finish(), GameStatus::Won);
        assert_eq!(board.finish(), GameStatus::Won);
    }

    #[test]
    fn tick_outside_play_is_ignored() {
        let mut board = Scoreboard::new(short_rules());
        assert_eq!(board.tick_second(), None);
        assert_eq!(board.time_left(), 3);
    }

    #[test]
    fn reset_returns_to_start() {
        let mut board = Scoreboard::new(short_rules());
        board.start();
        board.award(300);
        board.finish();
        board.reset();
        assert_eq!(board.status(), GameStatus::Start);
        assert_eq!(board.score(), 0);
    }
}
