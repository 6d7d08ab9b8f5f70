//! Waste-sorting rounds.
//!
//! The player drags each presented item into one of five colored bins.
//! Every drop resolves immediately and moves the round into
//! [`GamePhase::Feedback`]; the host shows the outcome for
//! [`GameConfig::sorting_feedback_pause`] and then calls
//! [`SortingSession::advance`].

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::gateway::KvGateway;
use crate::moves::Move;
use crate::session::{GamePhase, RoundSummary, SessionContext, SessionCore};
use crate::types::{Difficulty, GameKind};

/// Points awarded for dropping an item into the right bin.
pub const CORRECT_POINTS: u32 = 20;

/// Collection bins, identified by their color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinColor {
    Green,
    Blue,
    Yellow,
    Red,
    Gray,
}

impl BinColor {
    /// All bins, in the order the board lays them out.
    pub const ALL: [BinColor; 5] = [
        BinColor::Green,
        BinColor::Blue,
        BinColor::Yellow,
        BinColor::Red,
        BinColor::Gray,
    ];

    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinColor::Green => "green",
            BinColor::Blue => "blue",
            BinColor::Yellow => "yellow",
            BinColor::Red => "red",
            BinColor::Gray => "gray",
        }
    }

    /// Material the bin collects, for feedback messages.
    pub fn material(&self) -> &'static str {
        match self {
            BinColor::Green => "glass and organic waste",
            BinColor::Blue => "paper and cardboard",
            BinColor::Yellow => "metal",
            BinColor::Red => "plastic",
            BinColor::Gray => "residual waste",
        }
    }
}

impl std::fmt::Display for BinColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One piece of waste the round can present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteItem {
    /// Stable content identifier.
    pub id: String,
    /// Display name shown on the draggable card.
    pub name: String,
    /// Bin the item belongs in.
    pub bin: BinColor,
    /// Difficulty tier the item is drawn at.
    pub difficulty: Difficulty,
}

/// Result of dropping the current item into a bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    /// Whether the chosen bin was the right one.
    pub correct: bool,
    /// Bin the player chose.
    pub selected: BinColor,
    /// Bin the item belongs in.
    pub expected: BinColor,
    /// Points awarded for this drop.
    pub points_awarded: u32,
    /// Name of the sorted item, for the feedback line.
    pub item_name: String,
}

/// Controller for one waste-sorting round.
pub struct SortingSession {
    core: SessionCore,
    pool: Vec<WasteItem>,
    round: Vec<WasteItem>,
    current: usize,
    presented_at: Option<Instant>,
}

impl std::fmt::Debug for SortingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortingSession")
            .field("pool", &self.pool)
            .field("round", &self.round)
            .field("current", &self.current)
            .field("presented_at", &self.presented_at)
            .finish_non_exhaustive()
    }
}

impl SortingSession {
    /// Builds a round from the items matching the context difficulty.
    ///
    /// Returns [`GameError::EmptyPool`] when no item matches.
    pub fn new(
        ctx: &SessionContext,
        gateway: Arc<dyn KvGateway>,
        config: Arc<GameConfig>,
        pool: Vec<WasteItem>,
    ) -> Result<Self, GameError> {
        let eligible: Vec<WasteItem> = pool
            .into_iter()
            .filter(|item| item.difficulty == ctx.difficulty)
            .collect();
        if eligible.is_empty() {
            return Err(GameError::EmptyPool {
                game: GameKind::Sorting,
                difficulty: ctx.difficulty,
            });
        }
        let cap = config.sorting_round_cap;
        let round = super::deal(eligible.clone(), cap);
        Ok(Self {
            core: SessionCore::new(ctx, GameKind::Sorting, gateway, config),
            pool: eligible,
            round,
            current: 0,
            presented_at: None,
        })
    }

    /// Current phase of the round.
    pub fn phase(&self) -> GamePhase {
        self.core.phase()
    }

    /// Number of items dealt into this round.
    pub fn item_count(&self) -> usize {
        self.round.len()
    }

    /// One-based position of the item on the board.
    pub fn item_number(&self) -> usize {
        self.current + 1
    }

    /// Item currently waiting to be sorted, if the round is not over.
    pub fn current_item(&self) -> Option<&WasteItem> {
        self.round.get(self.current)
    }

    /// How long the host should show feedback before advancing.
    pub fn feedback_pause(&self) -> std::time::Duration {
        self.core.config().sorting_feedback_pause
    }

    /// Items sorted into the right bin so far.
    pub fn score(&self) -> u32 {
        self.core.correct()
    }

    /// Points earned so far.
    pub fn points(&self) -> u32 {
        self.core.points()
    }

    /// Moves buffered for the end-of-round flush.
    pub fn pending_len(&self) -> usize {
        self.core.pending_len()
    }

    /// Starts the round and presents the first item.
    pub fn begin(&mut self) -> Result<(), GameError> {
        self.core.begin()?;
        self.presented_at = Some(Instant::now());
        Ok(())
    }

    /// Drops the current item into `bin` and enters feedback.
    pub fn drop_item(&mut self, bin: BinColor) -> Result<SortOutcome, GameError> {
        if self.core.phase() != GamePhase::InProgress {
            return Err(GameError::SessionInvalid {
                reason: "no item is waiting to be sorted".into(),
            });
        }
        let item = match self.round.get(self.current) {
            Some(item) => item.clone(),
            None => {
                return Err(GameError::SessionInvalid {
                    reason: "round has no current item".into(),
                })
            }
        };
        let correct = bin == item.bin;
        let response_time = self
            .presented_at
            .map(|t| t.elapsed().as_secs() as u32)
            .unwrap_or(0);
        let points = if correct { CORRECT_POINTS } else { 0 };
        let extra = Map::from_iter([
            ("item_id".to_string(), Value::from(item.id.clone())),
            ("item_name".to_string(), Value::from(item.name.clone())),
            ("selected_bin".to_string(), Value::from(bin.as_str())),
            ("correct_bin".to_string(), Value::from(item.bin.as_str())),
        ]);
        self.core
            .record(Move::new(correct, response_time, points).with_extra(extra));
        self.core.enter_feedback()?;
        Ok(SortOutcome {
            correct,
            selected: bin,
            expected: item.bin,
            points_awarded: points,
            item_name: item.name,
        })
    }

    /// Moves past the feedback pause.
    ///
    /// Presents the next item, or finishes the round and flushes the
    /// buffered moves when the last item has been sorted.
    pub async fn advance(&mut self) -> Result<Option<RoundSummary>, GameError> {
        if self.core.phase() != GamePhase::Feedback {
            return Err(GameError::SessionInvalid {
                reason: "no feedback to advance past".into(),
            });
        }
        if self.current + 1 < self.round.len() {
            self.current += 1;
            self.core.resume_play()?;
            self.presented_at = Some(Instant::now());
            return Ok(None);
        }
        let summary = self.core.complete(self.round.len() as u32).await?;
        Ok(Some(summary))
    }

    /// Deals a fresh round from the same pool.
    pub fn restart(&mut self) {
        self.core.restart();
        let cap = self.core.config().sorting_round_cap;
        self.round = super::deal(self.pool.clone(), cap);
        self.current = 0;
        self.presented_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use crate::types::{FamilyToken, PlayerId};

    fn context(level: u8) -> SessionContext {
        SessionContext::new(
            PlayerId::new("p-1"),
            FamilyToken::new("fam-1"),
            Difficulty::clamped(level),
        )
    }

    fn item(id: &str, bin: BinColor, level: u8) -> WasteItem {
        WasteItem {
            id: id.to_string(),
            name: format!("item {id}"),
            bin,
            difficulty: Difficulty::clamped(level),
        }
    }

    fn pool(level: u8, count: usize) -> Vec<WasteItem> {
        (0..count)
            .map(|i| {
                let bin = BinColor::ALL[i % BinColor::ALL.len()];
                item(&format!("w-{i}"), bin, level)
            })
            .collect()
    }

    fn session(level: u8, count: usize) -> (SortingSession, Arc<MemoryKvStore>) {
        let store = Arc::new(MemoryKvStore::new());
        let session = SortingSession::new(
            &context(level),
            store.clone(),
            Arc::new(GameConfig::default()),
            pool(level, count),
        )
        .unwrap();
        (session, store)
    }

    #[test]
    fn deals_only_matching_difficulty() {
        let mut mixed = pool(3, 4);
        mixed.extend(pool(7, 6));
        let session = SortingSession::new(
            &context(3),
            Arc::new(MemoryKvStore::new()),
            Arc::new(GameConfig::default()),
            mixed,
        )
        .unwrap();
        assert_eq!(session.item_count(), 4);
    }

    #[test]
    fn caps_round_at_configured_size() {
        let (session, _) = session(5, 12);
        assert_eq!(session.item_count(), 5);
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = SortingSession::new(
            &context(9),
            Arc::new(MemoryKvStore::new()),
            Arc::new(GameConfig::default()),
            pool(2, 8),
        )
        .unwrap_err();
        assert!(matches!(err, GameError::EmptyPool { .. }));
    }

    #[test]
    fn correct_drop_awards_points_and_enters_feedback() {
        let (mut session, _) = session(5, 6);
        session.begin().unwrap();
        let expected = session.current_item().unwrap().bin;
        let outcome = session.drop_item(expected).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.points_awarded, CORRECT_POINTS);
        assert_eq!(session.phase(), GamePhase::Feedback);
        assert_eq!(session.score(), 1);
        assert_eq!(session.points(), CORRECT_POINTS);
        assert_eq!(session.pending_len(), 1);
    }

    #[test]
    fn wrong_drop_reports_expected_bin() {
        let (mut session, _) = session(5, 6);
        session.begin().unwrap();
        let expected = session.current_item().unwrap().bin;
        let wrong = BinColor::ALL
            .into_iter()
            .find(|bin| *bin != expected)
            .unwrap();
        let outcome = session.drop_item(wrong).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.selected, wrong);
        assert_eq!(outcome.expected, expected);
        assert_eq!(outcome.points_awarded, 0);
        assert_eq!(session.points(), 0);
    }

    #[test]
    fn drop_outside_play_is_rejected() {
        let (mut session, _) = session(5, 6);
        let err = session.drop_item(BinColor::Green).unwrap_err();
        assert!(matches!(err, GameError::SessionInvalid { .. }));

        session.begin().unwrap();
        let expected = session.current_item().unwrap().bin;
        session.drop_item(expected).unwrap();
        let err = session.drop_item(expected).unwrap_err();
        assert!(matches!(err, GameError::SessionInvalid { .. }));
    }

    #[tokio::test]
    async fn advance_presents_next_item() {
        let (mut session, _) = session(5, 6);
        session.begin().unwrap();
        let expected = session.current_item().unwrap().bin;
        session.drop_item(expected).unwrap();
        let summary = session.advance().await.unwrap();
        assert!(summary.is_none());
        assert_eq!(session.item_number(), 2);
        assert_eq!(session.phase(), GamePhase::InProgress);
    }

    #[tokio::test]
    async fn finishing_the_round_flushes_every_move() {
        let (mut session, store) = session(5, 6);
        session.begin().unwrap();
        let mut summary = None;
        for _ in 0..session.item_count() {
            let expected = session.current_item().unwrap().bin;
            session.drop_item(expected).unwrap();
            summary = session.advance().await.unwrap();
        }
        let summary = summary.unwrap();
        assert_eq!(summary.score, 5);
        assert_eq!(summary.total, 5);
        assert!(summary.passed());
        assert_eq!(session.phase(), GamePhase::Over);
        assert_eq!(store.len(), 5);
        assert_eq!(session.pending_len(), 0);

        let err = session.advance().await.unwrap_err();
        assert!(matches!(err, GameError::SessionInvalid { .. }));
        assert_eq!(store.len(), 5);
    }

    #[tokio::test]
    async fn restart_discards_buffered_moves() {
        let (mut session, store) = session(5, 6);
        session.begin().unwrap();
        let expected = session.current_item().unwrap().bin;
        session.drop_item(expected).unwrap();
        session.restart();
        assert_eq!(session.pending_len(), 0);
        assert_eq!(session.phase(), GamePhase::NotStarted);

        session.begin().unwrap();
        for _ in 0..session.item_count() {
            let expected = session.current_item().unwrap().bin;
            session.drop_item(expected).unwrap();
            session.advance().await.unwrap();
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn bins_cover_the_five_materials() {
        assert_eq!(BinColor::Green.material(), "glass and organic waste");
        assert_eq!(BinColor::Blue.material(), "paper and cardboard");
        assert_eq!(BinColor::Yellow.material(), "metal");
        assert_eq!(BinColor::Red.material(), "plastic");
        assert_eq!(BinColor::Gray.material(), "residual waste");
        assert_eq!(BinColor::Yellow.to_string(), "yellow");
    }

    #[test]
    fn feedback_pause_comes_from_config() {
        let (session, _) = session(5, 6);
        assert_eq!(
            session.feedback_pause(),
            std::time::Duration::from_secs(2)
        );
    }
}
