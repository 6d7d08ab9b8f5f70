//! Multiple-choice recycling quiz.
//!
//! A round is up to ten questions at the session's difficulty, each with a
//! per-question countdown. Answers resolve into buffered moves immediately;
//! the buffer is flushed once when the round ends.

use crate::config::GameConfig;
use crate::error::GameError;
use crate::games;
use crate::gateway::KvGateway;
use crate::moves::Move;
use crate::session::{format_clock, GamePhase, RoundSummary, SessionContext, SessionCore};
use crate::types::{Difficulty, GameKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map};
use std::sync::Arc;
use std::time::Instant;

/// Points for a correct answer.
pub const CORRECT_POINTS: u32 = 10;

/// Answer text recorded when the clock expires before a choice is made.
pub const TIME_EXPIRED: &str = "time expired";

/// A multiple-choice question in the quiz pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub difficulty: Difficulty,
    pub explanation: String,
}

/// Immediate feedback for one resolved question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_index: usize,
    pub points_awarded: u32,
    pub explanation: String,
    /// Whether the question resolved by clock expiry rather than a choice.
    pub timed_out: bool,
}

/// One quiz round for one player.
pub struct QuizSession {
    core: SessionCore,
    /// Full difficulty-filtered pool, kept for restarts.
    pool: Vec<QuizQuestion>,
    round: Vec<QuizQuestion>,
    current: usize,
    clock_remaining: u64,
    presented_at: Option<Instant>,
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("pool", &self.pool)
            .field("round", &self.round)
            .field("current", &self.current)
            .field("clock_remaining", &self.clock_remaining)
            .field("presented_at", &self.presented_at)
            .finish_non_exhaustive()
    }
}

impl QuizSession {
    /// Build a session from the content pool.
    ///
    /// The pool is filtered to the context's exact difficulty; an empty
    /// filtered pool is [`GameError::EmptyPool`]. The round is a fresh
    /// shuffle truncated to the configured cap.
    pub fn new(
        ctx: &SessionContext,
        gateway: Arc<dyn KvGateway>,
        config: Arc<GameConfig>,
        pool: Vec<QuizQuestion>,
    ) -> Result<Self, GameError> {
        let filtered: Vec<QuizQuestion> = pool
            .into_iter()
            .filter(|q| q.difficulty == ctx.difficulty)
            .collect();
        if filtered.is_empty() {
            return Err(GameError::EmptyPool {
                game: GameKind::Quiz,
                difficulty: ctx.difficulty,
            });
        }

        let mut session = Self {
            core: SessionCore::new(ctx, GameKind::Quiz, gateway, config),
            pool: filtered,
            round: Vec::new(),
            current: 0,
            clock_remaining: 0,
            presented_at: None,
        };
        session.deal();
        Ok(session)
    }

    fn deal(&mut self) {
        let cap = self.core.config().quiz_round_cap;
        self.round = games::deal(self.pool.clone(), cap);
        self.current = 0;
        self.clock_remaining = self.core.config().quiz_question_secs;
        self.presented_at = None;
    }

    pub fn phase(&self) -> GamePhase {
        self.core.phase()
    }

    /// Questions in this round: `min(pool size, configured cap)`.
    pub fn question_count(&self) -> usize {
        self.round.len()
    }

    /// 1-based number of the question being shown.
    pub fn question_number(&self) -> usize {
        self.current + 1
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.round.get(self.current)
    }

    pub fn clock_remaining(&self) -> u64 {
        self.clock_remaining
    }

    pub fn clock_display(&self) -> String {
        format_clock(self.clock_remaining)
    }

    /// Correct answers so far.
    pub fn score(&self) -> u32 {
        self.core.correct()
    }

    pub fn points(&self) -> u32 {
        self.core.points()
    }

    pub fn pending_len(&self) -> usize {
        self.core.pending_len()
    }

    /// Start the round: first question presented, clock running.
    pub fn begin(&mut self) -> Result<(), GameError> {
        self.core.begin()?;
        self.clock_remaining = self.core.config().quiz_question_secs;
        self.presented_at = Some(Instant::now());
        Ok(())
    }

    /// Resolve the current question with the player's choice.
    pub fn answer(&mut self, choice: Option<usize>) -> Result<AnswerOutcome, GameError> {
        if self.core.phase() != GamePhase::InProgress {
            return Err(GameError::SessionInvalid {
                reason: format!("cannot answer from {:?}", self.core.phase()),
            });
        }
        self.resolve(choice, false)
    }

    /// One-second countdown tick. Inert outside `InProgress`. When the
    /// clock hits zero the question auto-resolves as unanswered and the
    /// expiry outcome is returned.
    pub fn tick(&mut self) -> Result<Option<AnswerOutcome>, GameError> {
        if self.core.phase() != GamePhase::InProgress {
            return Ok(None);
        }
        self.clock_remaining = self.clock_remaining.saturating_sub(1);
        if self.clock_remaining == 0 {
            return self.resolve(None, true).map(Some);
        }
        Ok(None)
    }

    /// Leave feedback: present the next question with a fresh clock, or end
    /// the round after the last one.
    pub async fn advance(&mut self) -> Result<Option<RoundSummary>, GameError> {
        if self.core.phase() != GamePhase::Feedback {
            return Err(GameError::SessionInvalid {
                reason: format!("cannot advance from {:?}", self.core.phase()),
            });
        }
        if self.current + 1 < self.round.len() {
            self.core.resume_play()?;
            self.current += 1;
            self.clock_remaining = self.core.config().quiz_question_secs;
            self.presented_at = Some(Instant::now());
            Ok(None)
        } else {
            let summary = self.core.complete(self.round.len() as u32).await?;
            Ok(Some(summary))
        }
    }

    /// Fresh shuffle, zeroed tallies, discarded buffer.
    pub fn restart(&mut self) {
        self.core.restart();
        self.deal();
    }

    fn resolve(&mut self, choice: Option<usize>, timed_out: bool) -> Result<AnswerOutcome, GameError> {
        let question = match self.round.get(self.current) {
            Some(q) => q.clone(),
            None => {
                return Err(GameError::SessionInvalid {
                    reason: "no question is live".to_string(),
                })
            }
        };
        if let Some(i) = choice {
            if i >= question.options.len() {
                return Err(GameError::Validation {
                    reason: format!("option {i} out of range for question {}", question.id),
                });
            }
        }

        let correct = choice == Some(question.correct_index);
        let response_time = if timed_out {
            self.core.config().quiz_question_secs as u32
        } else {
            self.presented_at
                .map(|t| t.elapsed().as_secs() as u32)
                .unwrap_or(0)
        };
        let chosen = match choice {
            Some(i) => question.options[i].clone(),
            None => TIME_EXPIRED.to_string(),
        };
        let points = if correct { CORRECT_POINTS } else { 0 };

        let extra = Map::from_iter([
            ("question_id".to_string(), json!(question.id)),
            ("answer".to_string(), json!(chosen)),
            ("question".to_string(), json!(question.prompt)),
        ]);
        self.core
            .record(Move::new(correct, response_time, points).with_extra(extra));
        self.core.enter_feedback()?;

        Ok(AnswerOutcome {
            correct,
            correct_index: question.correct_index,
            points_awarded: points,
            explanation: question.explanation,
            timed_out,
        })
    }
}
