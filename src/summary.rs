//! Game-over summary and share text

use crate::best_score::BestScore;
use crate::sim::GameState;

/// What the game-over screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u64,
    pub best: u64,
    pub level: u32,
    /// This run set a new best score
    pub new_best: bool,
}

impl RunSummary {
    /// Close out a finished run, updating `best` if it was beaten
    pub fn record(state: &GameState, best: &mut BestScore) -> Self {
        let score = state.display_score();
        let new_best = best.submit(score);
        if new_best {
            log::info!("New best score: {}", score);
        }
        Self {
            score,
            best: best.value,
            level: state.level,
            new_best,
        }
    }

    /// One-line summary for the game-over overlay
    pub fn line(&self) -> String {
        format!(
            "Score: {}  •  Best: {}  •  Level reached: {}",
            self.score, self.best, self.level
        )
    }

    /// Text copied by the share button
    pub fn share_text(&self) -> String {
        share_text(self.score)
    }
}

pub fn share_text(score: u64) -> String {
    format!("I scored {} on Neon Dodge! Can you beat me?", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updates_best() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.score = 152.9;
        state.level = 3;
        let mut best = BestScore::new(100);

        let summary = RunSummary::record(&state, &mut best);
        assert_eq!(summary.score, 152);
        assert_eq!(summary.best, 152);
        assert!(summary.new_best);
        assert_eq!(best.value, 152);
        assert_eq!(
            summary.line(),
            "Score: 152  •  Best: 152  •  Level reached: 3"
        );
    }

    #[test]
    fn test_record_keeps_higher_best() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.score = 12.0;
        let mut best = BestScore::new(500);

        let summary = RunSummary::record(&state, &mut best);
        assert!(!summary.new_best);
        assert_eq!(summary.best, 500);
        assert_eq!(best.value, 500);
    }

    #[test]
    fn test_share_text() {
        assert_eq!(
            share_text(42),
            "I scored 42 on Neon Dodge! Can you beat me?"
        );
    }
}
