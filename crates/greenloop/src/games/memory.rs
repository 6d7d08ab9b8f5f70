//! Icon-matching memory rounds.
//!
//! The board deals `min(base pairs + difficulty, max pairs)` icon pairs face
//! down. A countdown sized by the difficulty starts on the first flip and
//! ends the round at zero; matching every pair ends it early. Flips on
//! matched cards, face-up cards, or while a pair awaits resolution are
//! ignored without error, since the board keeps taking taps while the
//! reveal plays out.

use crate::config::GameConfig;
use crate::error::GameError;
use crate::games;
use crate::gateway::KvGateway;
use crate::moves::Move;
use crate::session::{format_clock, GamePhase, RoundSummary, SessionContext, SessionCore};
use crate::types::GameKind;
use serde_json::{json, Map};
use std::sync::Arc;
use std::time::Instant;

/// Points for uncovering a matching pair.
pub const MATCH_POINTS: u32 = 15;

/// Icons the board draws pairs from.
pub const ECO_ICONS: [&str; 20] = [
    "♻️", "🌱", "🗑️", "🌍", "💧", "⚡", "🌳", "🏭", "🔋", "📦", "🍃", "☀️",
    "🌊", "🦋", "🐝", "🌺", "🍎", "🥤", "📰", "🧴",
];

/// One card on the board.
///
/// The icon is visible whenever `face_up` or `matched` is set; matched
/// cards drop `face_up` but stay revealed and locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCard {
    pub icon: &'static str,
    pub face_up: bool,
    pub matched: bool,
}

/// What a flip did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// The flip landed somewhere it cannot act and was dropped.
    Ignored,
    /// First card of an attempt turned face up.
    FaceUp,
    /// Second card completed a pair; resolution is pending.
    Matched,
    /// Second card missed; both flip back after the reset delay.
    Mismatched,
}

/// One memory round for one player.
pub struct MemorySession {
    core: SessionCore,
    board: Vec<MemoryCard>,
    pair_count: usize,
    first_pick: Option<usize>,
    /// Flipped pair waiting for [`MemorySession::resolve_flipped`].
    pending_pair: Option<(usize, usize, bool)>,
    clock_remaining: u64,
    clock_running: bool,
    matched_pairs: usize,
    started_at: Option<Instant>,
}

impl MemorySession {
    /// Build a session with a freshly shuffled board.
    ///
    /// Unlike the quiz and sorting games the board is self-contained, so
    /// construction cannot fail on missing content.
    pub fn new(ctx: &SessionContext, gateway: Arc<dyn KvGateway>, config: Arc<GameConfig>) -> Self {
        let mut session = Self {
            core: SessionCore::new(ctx, GameKind::Memory, gateway, config),
            board: Vec::new(),
            pair_count: 0,
            first_pick: None,
            pending_pair: None,
            clock_remaining: 0,
            clock_running: false,
            matched_pairs: 0,
            started_at: None,
        };
        session.deal();
        session
    }

    fn deal(&mut self) {
        let level = self.core.key().difficulty.value() as usize;
        let config = self.core.config();
        let pair_count = (config.memory_base_pairs + level)
            .min(config.memory_max_pairs)
            .min(ECO_ICONS.len());
        let clock = config.memory_base_secs + config.memory_secs_per_level * level as u64;

        let mut board = Vec::with_capacity(pair_count * 2);
        for &icon in &ECO_ICONS[..pair_count] {
            board.push(MemoryCard { icon, face_up: false, matched: false });
            board.push(MemoryCard { icon, face_up: false, matched: false });
        }
        games::shuffle(&mut board);

        self.board = board;
        self.pair_count = pair_count;
        self.first_pick = None;
        self.pending_pair = None;
        self.clock_remaining = clock;
        self.clock_running = false;
        self.matched_pairs = 0;
        self.started_at = None;
    }

    pub fn phase(&self) -> GamePhase {
        self.core.phase()
    }

    pub fn board(&self) -> &[MemoryCard] {
        &self.board
    }

    /// Pairs dealt onto the board.
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Pairs matched and resolved so far.
    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    /// Completed flip attempts, matched or not.
    pub fn moves(&self) -> u32 {
        self.core.attempts()
    }

    pub fn clock_remaining(&self) -> u64 {
        self.clock_remaining
    }

    pub fn clock_display(&self) -> String {
        format_clock(self.clock_remaining)
    }

    /// Matched pairs recorded so far, counting ones still mid-reveal.
    pub fn score(&self) -> u32 {
        self.core.correct()
    }

    pub fn points(&self) -> u32 {
        self.core.points()
    }

    pub fn pending_len(&self) -> usize {
        self.core.pending_len()
    }

    /// How long to reveal a matched pair before resolving it.
    pub fn match_confirm_delay(&self) -> std::time::Duration {
        self.core.config().memory_match_confirm
    }

    /// How long to show a mismatched pair before it flips back.
    pub fn mismatch_reset_delay(&self) -> std::time::Duration {
        self.core.config().memory_mismatch_reset
    }

    /// Start the round. The countdown only begins on the first flip.
    pub fn begin(&mut self) -> Result<(), GameError> {
        self.core.begin()?;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    /// Turn the card at `index` face up.
    ///
    /// The second flip of an attempt records the move immediately; the
    /// board state settles later through [`MemorySession::resolve_flipped`],
    /// after the host has shown the pair for the configured delay.
    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome, GameError> {
        if self.core.phase() != GamePhase::InProgress {
            return Ok(FlipOutcome::Ignored);
        }
        if index >= self.board.len() {
            return Err(GameError::Validation {
                reason: format!("card {index} out of range for a board of {}", self.board.len()),
            });
        }
        if self.pending_pair.is_some() {
            return Ok(FlipOutcome::Ignored);
        }
        if self.board[index].matched || self.board[index].face_up {
            return Ok(FlipOutcome::Ignored);
        }

        self.board[index].face_up = true;
        self.clock_running = true;

        match self.first_pick.take() {
            None => {
                self.first_pick = Some(index);
                Ok(FlipOutcome::FaceUp)
            }
            Some(first) => {
                let matched = self.board[first].icon == self.board[index].icon;
                let response_time = self
                    .started_at
                    .map(|t| t.elapsed().as_secs() as u32)
                    .unwrap_or(0);
                let move_number = self.core.attempts() + 1;
                let mut extra = Map::from_iter([("moves".to_string(), json!(move_number))]);
                let points = if matched {
                    extra.insert("icon".to_string(), json!(self.board[index].icon));
                    MATCH_POINTS
                } else {
                    0
                };
                self.core
                    .record(Move::new(matched, response_time, points).with_extra(extra));
                self.pending_pair = Some((first, index, matched));
                Ok(if matched {
                    FlipOutcome::Matched
                } else {
                    FlipOutcome::Mismatched
                })
            }
        }
    }

    /// Settle the flipped pair after its reveal delay.
    ///
    /// A matched pair locks in place; a mismatched pair turns back face
    /// down. Matching the last pair ends the round with time remaining.
    /// Inert when the round is not in play or no pair is waiting.
    pub async fn resolve_flipped(&mut self) -> Result<Option<RoundSummary>, GameError> {
        if self.core.phase() != GamePhase::InProgress {
            return Ok(None);
        }
        let (first, second, matched) = match self.pending_pair.take() {
            Some(pair) => pair,
            None => return Ok(None),
        };
        if matched {
            self.board[first].matched = true;
            self.board[first].face_up = false;
            self.board[second].matched = true;
            self.board[second].face_up = false;
            self.matched_pairs += 1;
            if self.matched_pairs == self.pair_count {
                let summary = self.core.complete(self.pair_count as u32).await?;
                return Ok(Some(summary));
            }
        } else {
            self.board[first].face_up = false;
            self.board[second].face_up = false;
        }
        Ok(None)
    }

    /// One-second countdown tick. Inert until the first flip and after the
    /// round ends; at zero the round is over and the moves flush.
    pub async fn tick(&mut self) -> Result<Option<RoundSummary>, GameError> {
        if self.core.phase() != GamePhase::InProgress || !self.clock_running {
            return Ok(None);
        }
        self.clock_remaining = self.clock_remaining.saturating_sub(1);
        if self.clock_remaining == 0 {
            let summary = self.core.complete(self.pair_count as u32).await?;
            return Ok(Some(summary));
        }
        Ok(None)
    }

    /// Fresh shuffle, full clock, discarded buffer.
    pub fn restart(&mut self) {
        self.core.restart();
        self.deal();
    }
}
