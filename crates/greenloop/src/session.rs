//! Shared session state machine.
//!
//! Every minigame controller wraps a [`SessionCore`]: the phase machine,
//! the running tallies, the pending-move buffer and the flush trigger.
//! Phases move `NotStarted → InProgress`, bounce through `Feedback` between
//! items, and end one-way in `Over`; `restart()` returns to `NotStarted`
//! with a fresh buffer.
//!
//! Player-driven operations on the wrong phase return
//! [`GameError::SessionInvalid`]; timer-delivered events (ticks, delayed
//! resolutions) are inert instead, so a late callback racing teardown can
//! never corrupt state.

use crate::config::GameConfig;
use crate::error::GameError;
use crate::gateway::KvGateway;
use crate::moves::{Move, PendingMoves};
use crate::records;
use crate::scoring;
use crate::types::{Difficulty, FamilyToken, GameKind, PlayerId, SessionKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    NotStarted,
    InProgress,
    Feedback,
    Over,
}

/// Who is playing, explicitly passed into every controller.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub player: PlayerId,
    pub family: FamilyToken,
    pub difficulty: Difficulty,
}

impl SessionContext {
    pub fn new(player: PlayerId, family: FamilyToken, difficulty: Difficulty) -> Self {
        Self {
            player,
            family,
            difficulty,
        }
    }
}

/// Outcome of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The pass threshold was cleared; the next difficulty is unlocked.
    LevelUnlocked,
    /// Below the threshold; same difficulty again.
    TryAgain,
}

impl Verdict {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= scoring::PASS_THRESHOLD {
            Verdict::LevelUnlocked
        } else {
            Verdict::TryAgain
        }
    }
}

/// Results computed at game over for the results screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    /// Correct resolutions (quiz answers, sorted items, matched pairs).
    pub score: u32,
    /// Resolutions the round asked for.
    pub total: u32,
    pub percentage: f64,
    pub verdict: Verdict,
}

impl RoundSummary {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::LevelUnlocked
    }
}

/// State shared by every minigame session.
///
/// Owns the phase machine, the tallies, the pending buffer, and the single
/// game-over flush. Controllers hold it by value; the buffer can never be
/// shared between two rounds.
pub struct SessionCore {
    key: SessionKey,
    gateway: Arc<dyn KvGateway>,
    config: Arc<GameConfig>,
    phase: GamePhase,
    correct: u32,
    attempts: u32,
    points: u32,
    pending: PendingMoves,
}

impl SessionCore {
    pub fn new(
        ctx: &SessionContext,
        game: GameKind,
        gateway: Arc<dyn KvGateway>,
        config: Arc<GameConfig>,
    ) -> Self {
        Self {
            key: SessionKey::new(ctx.player.clone(), game, ctx.difficulty),
            gateway,
            config,
            phase: GamePhase::NotStarted,
            correct: 0,
            attempts: 0,
            points: 0,
            pending: PendingMoves::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Correct resolutions so far.
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Resolutions so far, correct or not.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Points earned so far (sum of buffered move points).
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// `NotStarted → InProgress`.
    pub fn begin(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::NotStarted {
            return Err(GameError::SessionInvalid {
                reason: format!("cannot begin from {:?}", self.phase),
            });
        }
        self.phase = GamePhase::InProgress;
        Ok(())
    }

    /// `InProgress → Feedback`.
    pub fn enter_feedback(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::InProgress {
            return Err(GameError::SessionInvalid {
                reason: format!("cannot show feedback from {:?}", self.phase),
            });
        }
        self.phase = GamePhase::Feedback;
        Ok(())
    }

    /// `Feedback → InProgress`.
    pub fn resume_play(&mut self) -> Result<(), GameError> {
        if self.phase != GamePhase::Feedback {
            return Err(GameError::SessionInvalid {
                reason: format!("cannot resume play from {:?}", self.phase),
            });
        }
        self.phase = GamePhase::InProgress;
        Ok(())
    }

    /// Buffer a resolved action and update the tallies.
    pub fn record(&mut self, mv: Move) {
        self.attempts += 1;
        if mv.correct {
            self.correct += 1;
        }
        self.points += mv.points;
        self.pending.append(mv);
    }

    /// Transition into `Over` and flush the buffer.
    ///
    /// This is the only flush path: it fires exactly once per round because
    /// the transition is one-way. A second call returns
    /// [`GameError::SessionInvalid`] without touching the gateway. An empty
    /// buffer flushes nothing. A failed flush drops the drained moves and
    /// propagates the error; the round still counts as over.
    pub async fn complete(&mut self, total: u32) -> Result<RoundSummary, GameError> {
        if self.phase == GamePhase::Over {
            return Err(GameError::SessionInvalid {
                reason: "round already over".to_string(),
            });
        }
        self.phase = GamePhase::Over;

        let moves = self.pending.take_all();
        records::flush_moves(self.gateway.as_ref(), &self.key, moves).await?;

        let percentage = scoring::percentage(self.correct, total);
        Ok(RoundSummary {
            score: self.correct,
            total,
            percentage,
            verdict: Verdict::from_percentage(percentage),
        })
    }

    /// Return to `NotStarted` with zeroed tallies and a discarded buffer.
    pub fn restart(&mut self) {
        self.phase = GamePhase::NotStarted;
        self.correct = 0;
        self.attempts = 0;
        self.points = 0;
        self.pending.reset();
    }
}

/// Format a second count for the round clock, e.g. `125` → `"2:05"`.
pub fn format_clock(total_secs: u64) -> String {
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{mins}:{secs:02}")
}
