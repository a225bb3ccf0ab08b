use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ControllerState {
    /// No deck dealt yet (or the game was reset).
    Idle,
    Playing,
    /// All pairs found; only `reset` or a new game are accepted.
    Complete,
}

/// Result of a flip as seen by the input layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FlipAction {
    NoChange,
    Flipped,
    /// A pair is face-up. The caller must schedule [`GameController::resolve_pair`]
    /// after [`RESOLVE_DELAY_MS`], echoing back this generation.
    PairPending(Generation),
}

impl FlipAction {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct GameSession {
    engine: MatchEngine,
    difficulty: Difficulty,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    rating: Option<Rating>,
}

impl GameSession {
    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        (self.ended_at.unwrap_or(now) - self.started_at)
            .num_seconds()
            .max(0) as u32
    }
}

/// Owns the whole game state: the engine of the current session, the status
/// surface, and the generation counter that strands delayed callbacks from
/// previous sessions.
///
/// The controller never reads a clock; callers pass `now` in, which keeps it
/// deterministic under test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameController {
    session: Option<GameSession>,
    generation: Generation,
    status: Option<StatusMessage>,
}

impl GameController {
    pub fn new() -> Self {
        Self {
            session: None,
            generation: 0,
            status: Some(StatusMessage::start_prompt()),
        }
    }

    pub fn state(&self) -> ControllerState {
        match &self.session {
            None => ControllerState::Idle,
            Some(session) if session.engine.is_complete() => ControllerState::Complete,
            Some(_) => ControllerState::Playing,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state(), ControllerState::Playing)
    }

    pub fn cards(&self) -> &[Card] {
        self.session
            .as_ref()
            .map_or(&[], |session| session.engine.cards())
    }

    pub fn move_count(&self) -> u32 {
        self.session
            .as_ref()
            .map_or(0, |session| session.engine.move_count())
    }

    pub fn match_count(&self) -> CardCount {
        self.session
            .as_ref()
            .map_or(0, |session| session.engine.match_count())
    }

    pub fn pair_count(&self) -> CardCount {
        self.session
            .as_ref()
            .map_or(0, |session| session.engine.pair_count())
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.session.as_ref().map(|session| session.difficulty)
    }

    pub fn rating(&self) -> Option<Rating> {
        self.session.as_ref().and_then(|session| session.rating)
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Seconds since the deal; frozen at the completion time once the game
    /// ends, zero while idle.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        self.session
            .as_ref()
            .map_or(0, |session| session.elapsed_secs(now))
    }

    /// Deal a fresh shuffled deck and start the clock. Replaces any previous
    /// session; pending callbacks from it become stale.
    pub fn start_game(
        &mut self,
        difficulty: Difficulty,
        seed: u64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let engine = MatchEngine::new(ShuffledDeck::new(seed).generate(difficulty))?;
        self.generation = self.generation.wrapping_add(1);
        self.session = Some(GameSession {
            engine,
            difficulty,
            started_at: now,
            ended_at: None,
            rating: None,
        });
        self.status = Some(StatusMessage::game_started(difficulty));
        log::debug!(
            "started {} game, generation {}",
            difficulty.label(),
            self.generation
        );
        Ok(())
    }

    /// Forward a card activation to the engine. Silently ignored while idle
    /// or complete; unknown ids are a collaborator bug and error out.
    pub fn flip_card(&mut self, id: CardId) -> Result<FlipAction> {
        let Some(session) = &mut self.session else {
            return Ok(FlipAction::NoChange);
        };

        Ok(match session.engine.flip(id)? {
            FlipOutcome::NoChange => FlipAction::NoChange,
            FlipOutcome::Flipped => FlipAction::Flipped,
            FlipOutcome::PairReady => FlipAction::PairPending(self.generation),
        })
    }

    /// The delayed pair comparison. Callbacks scheduled against an earlier
    /// generation (the game was reset or restarted during the delay) return
    /// `Ok(None)` and leave the state untouched.
    pub fn resolve_pair(
        &mut self,
        generation: Generation,
        now: DateTime<Utc>,
    ) -> Result<Option<PairOutcome>> {
        if generation != self.generation {
            log::debug!(
                "dropping stale pair resolution (generation {} != {})",
                generation,
                self.generation
            );
            return Ok(None);
        }

        let session = self.session.as_mut().ok_or(GameError::GameNotStarted)?;
        let outcome = session.engine.resolve_pair()?;

        self.status = Some(match outcome {
            PairOutcome::Matched => StatusMessage::match_found(
                session.engine.match_count(),
                session.engine.pair_count(),
            ),
            PairOutcome::Mismatched => StatusMessage::mismatch(),
            PairOutcome::Won => {
                session.ended_at = Some(now);
                let rating = Rating::from_moves(session.engine.move_count());
                session.rating = Some(rating);
                log::debug!(
                    "game won in {} moves, {}s",
                    session.engine.move_count(),
                    session.elapsed_secs(now)
                );
                StatusMessage::game_won(
                    rating,
                    session.engine.move_count(),
                    session.elapsed_secs(now),
                )
            }
        });

        Ok(Some(outcome))
    }

    /// The timed auto-clear for transient messages. No-op for stale
    /// generations, persistent messages, and finished or idle games.
    pub fn clear_transient_status(&mut self, generation: Generation) -> bool {
        if generation != self.generation || !self.is_active() {
            return false;
        }
        match &self.status {
            Some(message) if message.is_transient() => {
                self.status = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the session and restore the idle prompt. Safe in every state;
    /// bumping the generation strands any pending pair resolution.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.session = None;
        self.status = Some(StatusMessage::start_prompt());
        log::debug!("reset, generation {}", self.generation);
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn t_secs(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(secs * 1000).unwrap()
    }

    fn started(difficulty: Difficulty) -> GameController {
        let mut controller = GameController::new();
        controller.start_game(difficulty, 5, t0()).unwrap();
        controller
    }

    /// Ids of the two cards carrying the given palette symbol.
    fn pair_ids(controller: &GameController, symbol: Symbol) -> (CardId, CardId) {
        let ids: Vec<CardId> = controller
            .cards()
            .iter()
            .filter(|card| card.symbol == symbol)
            .map(|card| card.id)
            .collect();
        (ids[0], ids[1])
    }

    /// Ids of two cards with different symbols.
    fn mismatched_ids(controller: &GameController) -> (CardId, CardId) {
        let first = controller.cards()[0];
        let second = controller
            .cards()
            .iter()
            .find(|card| card.symbol != first.symbol)
            .unwrap();
        (first.id, second.id)
    }

    #[test]
    fn new_controller_is_idle_with_the_start_prompt() {
        let controller = GameController::new();
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.cards().is_empty());
        assert_eq!(controller.elapsed_secs(t_secs(90)), 0);
        assert!(controller.status().unwrap().text.contains("Start Game"));
    }

    #[test]
    fn flips_are_ignored_while_idle() {
        let mut controller = GameController::new();
        assert_eq!(controller.flip_card(0).unwrap(), FlipAction::NoChange);
    }

    #[test]
    fn start_game_deals_the_requested_difficulty() {
        for difficulty in [Difficulty::Easy, Difficulty::Hard] {
            let controller = started(difficulty);
            assert_eq!(controller.state(), ControllerState::Playing);
            assert_eq!(controller.cards().len(), difficulty.card_count() as usize);
            assert_eq!(controller.pair_count(), difficulty.pair_count());
            assert_eq!(controller.move_count(), 0);
            assert_eq!(controller.match_count(), 0);
            let status = controller.status().unwrap();
            assert_eq!(status.kind, StatusKind::Info);
            assert!(status.text.contains(difficulty.label()));
        }
    }

    #[test]
    fn matched_pair_updates_counts_and_status() {
        let mut controller = started(Difficulty::Easy);
        let (first, second) = pair_ids(&controller, SYMBOL_PALETTE[0]);

        assert_eq!(controller.flip_card(first).unwrap(), FlipAction::Flipped);
        let FlipAction::PairPending(generation) = controller.flip_card(second).unwrap() else {
            panic!("second flip must request resolution");
        };

        let outcome = controller.resolve_pair(generation, t_secs(2)).unwrap();
        assert_eq!(outcome, Some(PairOutcome::Matched));
        assert_eq!(controller.match_count(), 1);
        assert_eq!(controller.move_count(), 1);
        assert!(controller
            .cards()
            .iter()
            .filter(|card| card.face.is_matched())
            .count()
            == 2);
        let status = controller.status().unwrap();
        assert_eq!(status.kind, StatusKind::Success);
        assert!(status.text.contains("(1/8)"));
    }

    #[test]
    fn mismatched_pair_flips_back_and_reports_error() {
        let mut controller = started(Difficulty::Easy);
        let (first, second) = mismatched_ids(&controller);

        controller.flip_card(first).unwrap();
        let FlipAction::PairPending(generation) = controller.flip_card(second).unwrap() else {
            panic!("second flip must request resolution");
        };

        let outcome = controller.resolve_pair(generation, t_secs(2)).unwrap();
        assert_eq!(outcome, Some(PairOutcome::Mismatched));
        assert_eq!(controller.match_count(), 0);
        assert_eq!(controller.move_count(), 1);
        assert!(controller.cards().iter().all(|card| !card.face.is_face_up()));
        assert_eq!(controller.status().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn stale_resolution_after_reset_is_ignored() {
        let mut controller = started(Difficulty::Easy);
        let (first, second) = pair_ids(&controller, SYMBOL_PALETTE[0]);

        controller.flip_card(first).unwrap();
        let FlipAction::PairPending(generation) = controller.flip_card(second).unwrap() else {
            panic!("second flip must request resolution");
        };

        controller.reset();
        assert_eq!(controller.resolve_pair(generation, t_secs(2)).unwrap(), None);
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn stale_resolution_after_restart_leaves_the_new_game_untouched() {
        let mut controller = started(Difficulty::Easy);
        let (first, second) = pair_ids(&controller, SYMBOL_PALETTE[0]);

        controller.flip_card(first).unwrap();
        let FlipAction::PairPending(generation) = controller.flip_card(second).unwrap() else {
            panic!("second flip must request resolution");
        };

        controller
            .start_game(Difficulty::Hard, 9, t_secs(1))
            .unwrap();
        assert_eq!(controller.resolve_pair(generation, t_secs(2)).unwrap(), None);
        assert_eq!(controller.move_count(), 0);
        assert!(controller.cards().iter().all(|card| !card.face.is_face_up()));
    }

    #[test]
    fn resolving_with_a_current_generation_but_no_pair_is_a_hard_error() {
        let mut controller = started(Difficulty::Easy);
        let generation = controller.generation();
        assert_eq!(
            controller.resolve_pair(generation, t0()),
            Err(GameError::PairNotReady)
        );
    }

    #[test]
    fn full_easy_game_completes_once_with_rating_and_times() {
        let mut controller = started(Difficulty::Easy);
        let deck: Vec<Card> = controller.cards().to_vec();

        for (round, symbol) in SYMBOL_PALETTE[..8].iter().enumerate() {
            let ids: Vec<CardId> = deck
                .iter()
                .filter(|card| card.symbol == *symbol)
                .map(|card| card.id)
                .collect();
            controller.flip_card(ids[0]).unwrap();
            let FlipAction::PairPending(generation) = controller.flip_card(ids[1]).unwrap() else {
                panic!("second flip must request resolution");
            };
            let outcome = controller
                .resolve_pair(generation, t_secs(round as i64 + 1))
                .unwrap();
            if round == 7 {
                assert_eq!(outcome, Some(PairOutcome::Won));
            } else {
                assert_eq!(outcome, Some(PairOutcome::Matched));
            }
        }

        assert_eq!(controller.state(), ControllerState::Complete);
        assert!(!controller.is_active());
        assert_eq!(controller.move_count(), 8);
        assert_eq!(controller.rating(), Some(Rating::from_moves(8)));

        let status = controller.status().unwrap();
        assert_eq!(status.kind, StatusKind::Complete);
        assert!(status.text.contains("8 moves in 8s"));

        // clock frozen at completion
        assert_eq!(controller.elapsed_secs(t_secs(500)), 8);

        // no flips accepted until a new game
        let any_id = controller.cards()[0].id;
        assert_eq!(controller.flip_card(any_id).unwrap(), FlipAction::NoChange);
        controller.start_game(Difficulty::Easy, 6, t_secs(10)).unwrap();
        assert_eq!(controller.state(), ControllerState::Playing);
    }

    #[test]
    fn reset_clears_everything_and_blocks_flips() {
        let mut controller = started(Difficulty::Hard);
        controller.flip_card(controller.cards()[0].id).unwrap();

        controller.reset();
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.cards().is_empty());
        assert_eq!(controller.move_count(), 0);
        assert_eq!(controller.match_count(), 0);
        assert_eq!(controller.elapsed_secs(t_secs(30)), 0);
        assert_eq!(controller.flip_card(0).unwrap(), FlipAction::NoChange);

        let status = controller.status().unwrap();
        assert_eq!(status.kind, StatusKind::Info);

        // reset is idempotent
        controller.reset();
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[test]
    fn transient_status_clears_only_for_the_current_generation() {
        let mut controller = started(Difficulty::Easy);
        let generation = controller.generation();

        assert!(!controller.clear_transient_status(generation - 1));
        assert!(controller.status().is_some());

        assert!(controller.clear_transient_status(generation));
        assert!(controller.status().is_none());
        assert!(!controller.clear_transient_status(generation));
    }

    #[test]
    fn completion_message_survives_the_auto_clear() {
        let mut controller = started(Difficulty::Easy);
        let deck: Vec<Card> = controller.cards().to_vec();

        for symbol in SYMBOL_PALETTE[..8].iter() {
            let ids: Vec<CardId> = deck
                .iter()
                .filter(|card| card.symbol == *symbol)
                .map(|card| card.id)
                .collect();
            controller.flip_card(ids[0]).unwrap();
            let FlipAction::PairPending(generation) = controller.flip_card(ids[1]).unwrap() else {
                panic!("second flip must request resolution");
            };
            controller.resolve_pair(generation, t_secs(1)).unwrap();
        }

        let generation = controller.generation();
        assert!(!controller.clear_transient_status(generation));
        assert_eq!(controller.status().unwrap().kind, StatusKind::Complete);
    }

    #[test]
    fn elapsed_time_runs_while_playing() {
        let controller = started(Difficulty::Easy);
        assert_eq!(controller.elapsed_secs(t_secs(0)), 0);
        assert_eq!(controller.elapsed_secs(t_secs(42)), 42);
    }
}
