//! Scene lifecycle: Preload -> Play -> Win / Game-Over -> Preload
//!
//! Each presentation screen waits for a single start-key press to advance.
//! Terminal transitions out of Play carry the final score and the (possibly
//! just-updated) high score for display.

use serde::{Deserialize, Serialize};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Won,
    Lost,
}

/// Hand-off record passed to the Win and Game-Over screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u32,
    pub high_score: u32,
}

/// Active screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Preload,
    Play,
    Win(RunSummary),
    GameOver(RunSummary),
}

impl Screen {
    /// Next screen when the start key is pressed, or `None` when the press
    /// is handled inside the screen itself (Play forwards it to the sim)
    pub fn on_start_key(self) -> Option<Screen> {
        match self {
            Screen::Preload => Some(Screen::Play),
            Screen::Play => None,
            Screen::Win(_) | Screen::GameOver(_) => Some(Screen::Preload),
        }
    }

    /// Terminal transition out of the Play screen
    pub fn on_run_over(self, outcome: RunOutcome, summary: RunSummary) -> Screen {
        match outcome {
            RunOutcome::Won => Screen::Win(summary),
            RunOutcome::Lost => Screen::GameOver(summary),
        }
    }

    /// Banner text the screen displays, if any
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            Screen::Preload => Some("Press space to start"),
            Screen::Play => None,
            Screen::Win(_) => Some("You Win"),
            Screen::GameOver(_) => Some("Game Over"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_key_cycle() {
        assert_eq!(Screen::Preload.on_start_key(), Some(Screen::Play));
        assert_eq!(Screen::Play.on_start_key(), None);

        let summary = RunSummary {
            score: 1200,
            high_score: 5000,
        };
        assert_eq!(Screen::Win(summary).on_start_key(), Some(Screen::Preload));
        assert_eq!(
            Screen::GameOver(summary).on_start_key(),
            Some(Screen::Preload)
        );
    }

    #[test]
    fn test_run_over_carries_summary() {
        let summary = RunSummary {
            score: 900,
            high_score: 900,
        };
        match Screen::Play.on_run_over(RunOutcome::Won, summary) {
            Screen::Win(s) => assert_eq!(s, summary),
            other => panic!("expected Win, got {other:?}"),
        }
        match Screen::Play.on_run_over(RunOutcome::Lost, summary) {
            Screen::GameOver(s) => assert_eq!(s.score, 900),
            other => panic!("expected GameOver, got {other:?}"),
        }
    }
}
