//! Sequence of moves played from a starting position

use crate::moves::{self, uci, Make, Move, Undo};
use crate::position::{FenParseError, Position};

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Error parsing a space-separated list of UCI moves
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot parse UCI move #{}: {}", .pos + 1, .source)]
pub struct UciListParseError {
    /// Zero-based index of the offending move in the list
    pub pos: usize,
    pub source: uci::ParseError,
}

/// Game played from a starting position
///
/// Moves are applied in place and can be taken back with [`Game::pop()`]. Every position reached
/// is counted by its Zobrist hash to detect repetitions.
#[derive(Debug, Clone)]
pub struct Game {
    pos: Position,
    stack: Vec<(Move, Undo)>,
    repeat: HashMap<u64, usize>,
}

impl Game {
    pub fn new(pos: Position) -> Game {
        let mut res = Game {
            pos,
            stack: Vec::new(),
            repeat: HashMap::new(),
        };
        res.count_current();
        res
    }

    #[inline]
    pub fn initial() -> Game {
        Game::new(Position::initial())
    }

    pub fn from_fen(fen: &str) -> Result<Game, FenParseError> {
        Ok(Game::new(Position::from_fen(fen)?))
    }

    /// Current position
    #[inline]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.stack.iter().map(|(mv, _)| *mv)
    }

    /// Number of times the current position has occurred in the game
    pub fn repeat_count(&self) -> usize {
        self.repeat
            .get(&self.pos.zobrist_hash())
            .copied()
            .unwrap_or(0)
    }

    fn count_current(&mut self) {
        *self.repeat.entry(self.pos.zobrist_hash()).or_insert(0) += 1;
    }

    fn uncount_current(&mut self) {
        let hash = self.pos.zobrist_hash();
        if let Some(count) = self.repeat.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.repeat.remove(&hash);
            }
        }
    }

    fn push_made<M: Make>(&mut self, m: &M) -> Result<Move, M::Err> {
        let (mv, u) = m.make_raw(&mut self.pos)?;
        self.stack.push((mv, u));
        self.count_current();
        Ok(mv)
    }

    /// Plays `mv`, which must be legal in the current position
    pub fn push(&mut self, mv: Move) {
        match self.push_made(&mv) {
            Ok(_) => {}
            Err(e) => match e {},
        }
    }

    /// Plays a move given in UCI format
    ///
    /// On error, the game is left unchanged.
    pub fn push_uci(&mut self, s: &str) -> Result<Move, uci::ParseError> {
        self.push_made(&moves::Uci(s))
    }

    /// Plays all the moves from a space-separated UCI list, like `"e2e4 e7e5 g1f3"`
    ///
    /// On error, the moves preceding the offending one stay applied.
    pub fn push_uci_list(&mut self, uci_list: &str) -> Result<(), UciListParseError> {
        for (pos, token) in uci_list.split_ascii_whitespace().enumerate() {
            self.push_uci(token)
                .map_err(|source| UciListParseError { pos, source })?;
        }
        Ok(())
    }

    /// Takes back the last move
    pub fn pop(&mut self) -> Option<Move> {
        let (mv, u) = self.stack.pop()?;
        self.uncount_current();
        self.pos.unmake_move(mv, u);
        Some(mv)
    }

    /// Returns the moves in UCI format, separated with spaces
    pub fn uci_list(&self) -> UciList<'_> {
        UciList(self)
    }
}

pub struct UciList<'a>(&'a Game);

impl<'a> fmt::Display for UciList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, mv) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", mv.uci())?;
        }
        Ok(())
    }
}
