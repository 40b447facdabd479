//! Utilities to work with moves in UCI format

use super::base::{self, PromotePiece};
use crate::position::Position;
use crate::types::{Square, SquareParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error creating a parsed UCI representation from string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(SquareParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(SquareParseError),
    /// Bad promote character
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

/// Error parsing UCI into a legal [`moves::Move`](super::Move)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Error parsing move
    #[error("cannot parse move: {0}")]
    Parse(#[from] RawParseError),
    /// No legal move matches the parsed one
    #[error("illegal move {0}")]
    Illegal(Move),
}

/// Parsed move in UCI format
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// Source square
    pub src: Square,
    /// Destination square
    pub dst: Square,
    /// Piece to promote, if any
    pub promote: Option<PromotePiece>,
}

impl Move {
    /// Finds the legal move in `pos` with the same squares and promotion
    pub fn into_move(self, pos: &Position) -> Result<base::Move, ParseError> {
        pos.legal_moves()
            .iter()
            .copied()
            .find(|mv| mv.uci() == self)
            .ok_or(ParseError::Illegal(self))
    }
}

impl From<base::Move> for Move {
    #[inline]
    fn from(mv: base::Move) -> Move {
        mv.uci()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        match self.promote {
            Some(PromotePiece::Knight) => write!(f, "n")?,
            Some(PromotePiece::Bishop) => write!(f, "b")?,
            Some(PromotePiece::Rook) => write!(f, "r")?,
            Some(PromotePiece::Queen) => write!(f, "q")?,
            None => {}
        };
        Ok(())
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !s.is_ascii() || !matches!(s.len(), 4 | 5) {
            return Err(RawParseError::BadLength);
        }
        let src = Square::from_str(&s[0..2]).map_err(RawParseError::BadSrc)?;
        let dst = Square::from_str(&s[2..4]).map_err(RawParseError::BadDst)?;
        let promote = if s.len() == 5 {
            Some(match s.as_bytes()[4] {
                b'n' => PromotePiece::Knight,
                b'b' => PromotePiece::Bishop,
                b'r' => PromotePiece::Rook,
                b'q' => PromotePiece::Queen,
                b => return Err(RawParseError::BadPromote(b as char)),
            })
        } else {
            None
        };
        Ok(Move { src, dst, promote })
    }
}
