//! Game state management for the Gomoku GUI
//!
//! Wraps a [`GameSession`] and runs AI moves on a worker thread. Only one
//! worker exists at a time: anything that changes the displayed position
//! cancels the outstanding request and joins its thread first.
//!
//! The state owns a single [`AIEngine`]. It is moved into the worker for one
//! request and sent back with the result, so the line cache and the
//! tie-break source carry over from move to move.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::{Difficulty, EngineConfig};
use crate::engine::{AIEngine, MoveReport, SearchOutcome};
use crate::error::Result;
use crate::search::{CancelToken, ThreadYield};
use crate::session::{GameMode, GameSession};
use crate::{Pos, Stone};

/// Default save file, relative to the working directory
pub const SAVE_FILE: &str = "gomoku_save.json";

/// Slice used when sleeping through the thinking delay
const DELAY_SLICE: Duration = Duration::from_millis(10);

/// AI computation state
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<(AIEngine, Result<MoveReport>)>,
        token: CancelToken,
        handle: JoinHandle<()>,
        start_time: Instant,
    },
}

/// Move timer for tracking thinking time
pub struct MoveTimer {
    pub start_time: Option<Instant>,
    pub ai_thinking_time: Option<Duration>,
}

impl Default for MoveTimer {
    fn default() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ai_thinking_time: None,
        }
    }
}

impl MoveTimer {
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map_or(Duration::ZERO, |t| t.elapsed())
    }

    pub fn set_ai_time(&mut self, duration: Duration) {
        self.ai_thinking_time = Some(duration);
    }
}

/// Main game state
pub struct GameState {
    pub session: GameSession,
    pub config: EngineConfig,
    pub ai_state: AiState,
    pub last_ai_result: Option<MoveReport>,
    pub move_timer: MoveTimer,
    pub suggested_move: Option<Pos>,
    pub message: Option<String>,
    pub save_path: PathBuf,
    /// `None` while lent to a worker
    engine: Option<AIEngine>,
}

impl GameState {
    pub fn new(size: usize, mode: GameMode, config: EngineConfig) -> Result<Self> {
        let engine = AIEngine::with_config(config.clone())?.with_suspend(ThreadYield);
        Ok(Self {
            session: GameSession::new(size, mode)?,
            config,
            ai_state: AiState::Idle,
            last_ai_result: None,
            move_timer: MoveTimer::default(),
            suggested_move: None,
            message: None,
            save_path: PathBuf::from(SAVE_FILE),
            engine: Some(engine),
        })
    }

    /// Fix the AI's tie-break seed
    pub fn seed_ai(&mut self, seed: u64) {
        self.cancel_ai();
        self.engine = self.engine.take().map(|engine| engine.with_seed(seed));
    }

    /// Take back the engine from a finished worker, or build a fresh one if
    /// the worker never returned it.
    fn restore_engine(&mut self, engine: Option<AIEngine>) {
        self.engine = match engine {
            Some(engine) => Some(engine),
            None => match AIEngine::with_config(self.config.clone()) {
                Ok(engine) => Some(engine.with_suspend(ThreadYield)),
                Err(e) => {
                    warn!(error = %e, "could not rebuild AI engine");
                    self.message = Some(e.to_string());
                    None
                }
            },
        };
    }

    /// Replace the session with a fresh game
    pub fn new_game(&mut self, size: usize, mode: GameMode) {
        self.cancel_ai();
        match GameSession::new(size, mode) {
            Ok(session) => self.set_session(session),
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn set_session(&mut self, session: GameSession) {
        self.session = session;
        self.last_ai_result = None;
        self.suggested_move = None;
        self.message = None;
        self.move_timer = MoveTimer::default();
    }

    pub fn current_turn(&self) -> Stone {
        self.session.current_player()
    }

    /// Check if the side to move is played from the board
    pub fn is_human_turn(&self) -> bool {
        match self.session.mode() {
            GameMode::PvC { ai_color, .. } => self.current_turn() != ai_color,
            GameMode::PvP => true,
        }
    }

    /// Check if AI is currently thinking
    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Attempt to place a stone at the given position
    pub fn try_place_stone(&mut self, pos: Pos) -> std::result::Result<(), String> {
        if self.is_ai_thinking() {
            return Err("AI is thinking".to_string());
        }
        if !self.is_human_turn() {
            return Err("Not your turn".to_string());
        }

        self.session.make_move(pos).map_err(|e| e.to_string())?;
        self.after_move();
        Ok(())
    }

    fn after_move(&mut self) {
        self.suggested_move = None;
        self.message = None;
        self.move_timer.start();
    }

    /// Start AI thinking
    pub fn start_ai_thinking(&mut self) {
        if !self.session.is_ai_turn() || self.is_ai_thinking() {
            return;
        }
        let GameMode::PvC { difficulty, .. } = self.session.mode() else {
            return;
        };

        let Some(mut engine) = self.engine.take() else {
            return;
        };
        let board = self.session.board().clone();
        let color = self.current_turn();
        let delay = Duration::from_millis(self.config.think_delay_ms);
        let token = CancelToken::new();
        let worker_token = token.clone();
        let (tx, rx) = channel();

        let handle = thread::spawn(move || {
            let start = Instant::now();
            while start.elapsed() < delay && !worker_token.is_cancelled() {
                thread::sleep(DELAY_SLICE.min(delay.saturating_sub(start.elapsed())));
            }

            let result = engine.select_move_with_stats(&board, color, difficulty, &worker_token);
            // The receiver is gone once the request was abandoned
            let _ = tx.send((engine, result));
        });

        debug!(?color, %difficulty, "AI request started");
        self.ai_state = AiState::Thinking {
            receiver: rx,
            token,
            handle,
            start_time: Instant::now(),
        };
    }

    /// Cancel an outstanding AI request and wait for its worker to exit.
    pub fn cancel_ai(&mut self) {
        if let AiState::Thinking {
            receiver,
            token,
            handle,
            ..
        } = std::mem::replace(&mut self.ai_state, AiState::Idle)
        {
            token.cancel();
            if handle.join().is_err() {
                warn!("AI worker panicked");
            }
            let engine = receiver.try_recv().ok().map(|(engine, _)| engine);
            self.restore_engine(engine);
            debug!("AI request cancelled");
        }
    }

    /// Check if AI has finished thinking
    pub fn check_ai_result(&mut self) {
        let received = match &self.ai_state {
            AiState::Thinking {
                receiver,
                start_time,
                ..
            } => match receiver.try_recv() {
                Ok(result) => Ok((result, start_time.elapsed())),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => Err(()),
            },
            AiState::Idle => return,
        };

        if let AiState::Thinking { handle, .. } = std::mem::replace(&mut self.ai_state, AiState::Idle) {
            if handle.join().is_err() {
                warn!("AI worker panicked");
            }
        }

        let ((engine, result), elapsed) = match received {
            Ok(pair) => pair,
            Err(()) => {
                self.restore_engine(None);
                self.message = Some("AI error".to_string());
                return;
            }
        };
        self.restore_engine(Some(engine));
        self.move_timer.set_ai_time(elapsed);

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "AI request failed");
                self.message = Some(e.to_string());
                return;
            }
        };

        match report.outcome {
            SearchOutcome::Move(pos) => match self.session.make_move(pos) {
                Ok(()) => self.after_move(),
                Err(e) => {
                    warn!(%pos, error = %e, "AI move rejected");
                    self.message = Some(e.to_string());
                }
            },
            SearchOutcome::NoMove => self.message = Some("AI could not find a move".to_string()),
            SearchOutcome::Cancelled => {}
        }
        self.last_ai_result = Some(report);
    }

    /// Get AI thinking elapsed time
    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Request move suggestion for PvP mode
    pub fn request_suggestion(&mut self) {
        if self.session.is_over() || self.is_ai_thinking() {
            return;
        }

        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let board = self.session.board();
        let color = self.session.current_player();
        match engine.select_move_with_stats(board, color, Difficulty::Medium, &CancelToken::new()) {
            Ok(report) => {
                self.suggested_move = report.outcome.as_move();
                self.last_ai_result = Some(report);
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Undo last move. Against the AI, steps back to the human's previous turn.
    pub fn undo(&mut self) {
        self.cancel_ai();
        self.suggested_move = None;
        if let Err(e) = self.session.undo() {
            self.message = Some(e.to_string());
            return;
        }
        if let GameMode::PvC { ai_color, .. } = self.session.mode() {
            if self.current_turn() == ai_color {
                if let Err(e) = self.session.undo() {
                    self.message = Some(e.to_string());
                }
            }
        }
        self.move_timer.start();
    }

    pub fn redo(&mut self) {
        self.cancel_ai();
        self.suggested_move = None;
        if let Err(e) = self.session.redo() {
            self.message = Some(e.to_string());
        }
    }

    /// Show the position after `turn` moves
    pub fn jump_to(&mut self, turn: usize) {
        if turn == self.session.cursor() {
            return;
        }
        self.cancel_ai();
        self.suggested_move = None;
        if let Err(e) = self.session.jump_to(turn) {
            self.message = Some(e.to_string());
        }
    }

    pub fn save(&mut self) {
        self.message = Some(match self.session.save(&self.save_path) {
            Ok(()) => format!("Saved to {}", self.save_path.display()),
            Err(e) => {
                warn!(error = %e, "save failed");
                e.to_string()
            }
        });
    }

    pub fn load(&mut self) {
        self.cancel_ai();
        match GameSession::load(&self.save_path) {
            Ok(session) => {
                self.set_session(session);
                self.message = Some(format!("Loaded {}", self.save_path.display()));
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                self.message = Some(e.to_string());
            }
        }
    }
}

impl Drop for GameState {
    fn drop(&mut self) {
        self.cancel_ai();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> EngineConfig {
        EngineConfig {
            think_delay_ms: 0,
            ..EngineConfig::default()
        }
    }

    fn pvc(ai_color: Stone) -> GameState {
        let mode = GameMode::PvC {
            ai_color,
            difficulty: Difficulty::Easy,
        };
        GameState::new(15, mode, quick_config()).unwrap()
    }

    fn wait_for_ai(state: &mut GameState) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while state.is_ai_thinking() && Instant::now() < deadline {
            state.check_ai_result();
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_ai_replies_to_human_move() {
        let mut state = pvc(Stone::White);
        state.try_place_stone(Pos::new(7, 7)).unwrap();
        state.start_ai_thinking();
        assert!(state.is_ai_thinking());
        wait_for_ai(&mut state);

        assert_eq!(state.session.cursor(), 2);
        assert_eq!(state.session.board().get(Pos::new(6, 6)), Stone::White);
        assert!(state.last_ai_result.is_some());
    }

    #[test]
    fn test_engine_kept_across_ai_moves() {
        let mut state = pvc(Stone::White);
        state.try_place_stone(Pos::new(7, 7)).unwrap();
        state.start_ai_thinking();
        assert!(state.engine.is_none(), "engine is lent to the worker");
        wait_for_ai(&mut state);

        state.try_place_stone(Pos::new(8, 8)).unwrap();
        state.start_ai_thinking();
        wait_for_ai(&mut state);

        assert_eq!(state.session.cursor(), 4);
        let engine = state.engine.as_ref().unwrap();
        assert!(!engine.evaluator().cache().is_empty());
    }

    #[test]
    fn test_seeded_ai_is_reproducible() {
        let replies = |seed: u64| {
            let mut state = pvc(Stone::White);
            state.seed_ai(seed);
            for pos in [Pos::new(7, 7), Pos::new(9, 9)] {
                state.try_place_stone(pos).unwrap();
                state.start_ai_thinking();
                wait_for_ai(&mut state);
            }
            state.session.history().to_vec()
        };
        assert_eq!(replies(3), replies(3));
    }

    #[test]
    fn test_human_cannot_play_ai_color() {
        let mut state = pvc(Stone::Black);
        assert!(state.try_place_stone(Pos::new(7, 7)).is_err());
    }

    #[test]
    fn test_cancel_joins_worker() {
        let mode = GameMode::PvC {
            ai_color: Stone::White,
            difficulty: Difficulty::Easy,
        };
        let config = EngineConfig {
            think_delay_ms: 60_000,
            ..EngineConfig::default()
        };
        let mut state = GameState::new(15, mode, config).unwrap();
        state.try_place_stone(Pos::new(7, 7)).unwrap();
        state.start_ai_thinking();
        state.cancel_ai();
        assert!(!state.is_ai_thinking());
        assert_eq!(state.session.cursor(), 1);
        assert!(state.engine.is_some(), "cancelled worker hands the engine back");
    }

    #[test]
    fn test_undo_against_ai_steps_back_two() {
        let mut state = pvc(Stone::White);
        state.try_place_stone(Pos::new(7, 7)).unwrap();
        state.start_ai_thinking();
        wait_for_ai(&mut state);
        assert_eq!(state.session.cursor(), 2);

        state.undo();
        assert_eq!(state.session.cursor(), 0);
        assert_eq!(state.current_turn(), Stone::Black);
    }

    #[test]
    fn test_suggestion_in_pvp() {
        let mut state = GameState::new(15, GameMode::PvP, quick_config()).unwrap();
        state.request_suggestion();
        assert_eq!(state.suggested_move, Some(Pos::new(7, 7)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = GameState::new(9, GameMode::PvP, quick_config()).unwrap();
        state.save_path = dir.path().join("game.json");
        state.try_place_stone(Pos::new(4, 4)).unwrap();
        state.save();

        state.new_game(15, GameMode::PvP);
        assert_eq!(state.session.size(), 15);
        state.load();
        assert_eq!(state.session.size(), 9);
        assert_eq!(state.session.board().get(Pos::new(4, 4)), Stone::Black);
    }
}
