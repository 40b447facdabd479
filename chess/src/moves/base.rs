use super::uci;
use crate::castling;
use crate::position::Position;
use crate::types::{CastlingSide, Color, Piece, Square};

use std::fmt;
use std::str::FromStr;

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotePiece {
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
}

impl PromotePiece {
    /// Order in which promotions are generated
    pub const ALL: [PromotePiece; 4] = [
        PromotePiece::Rook,
        PromotePiece::Knight,
        PromotePiece::Bishop,
        PromotePiece::Queen,
    ];

    #[inline]
    pub const fn piece(self) -> Piece {
        match self {
            PromotePiece::Knight => Piece::Knight,
            PromotePiece::Bishop => Piece::Bishop,
            PromotePiece::Rook => Piece::Rook,
            PromotePiece::Queen => Piece::Queen,
        }
    }
}

impl From<PromotePiece> for Piece {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        p.piece()
    }
}

impl TryFrom<Piece> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(p: Piece) -> Result<Self, Self::Error> {
        match p {
            Piece::Knight => Ok(PromotePiece::Knight),
            Piece::Bishop => Ok(PromotePiece::Bishop),
            Piece::Rook => Ok(PromotePiece::Rook),
            Piece::Queen => Ok(PromotePiece::Queen),
            _ => Err(()),
        }
    }
}

/// Chess move
///
/// A move carries everything needed to apply and undo it: the moving piece, the captured piece (if any),
/// promotion, en passant and castling flags. Moves returned by the move generator are always legal and
/// have their check flag set.
///
/// For castling, the move describes the king's step. The rook's step is available via
/// [`Move::castling_rook()`] and is applied together with it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    piece: Piece,
    color: Color,
    from: Square,
    to: Square,
    captured: Option<Piece>,
    promote: Option<PromotePiece>,
    en_passant: bool,
    castling: Option<CastlingSide>,
    check: bool,
}

impl Move {
    /// Creates a non-capturing move of `piece` from `from` to `to`
    #[inline]
    pub const fn new(piece: Piece, color: Color, from: Square, to: Square) -> Move {
        Move {
            piece,
            color,
            from,
            to,
            captured: None,
            promote: None,
            en_passant: false,
            castling: None,
            check: false,
        }
    }

    /// Creates an en passant capture by the pawn of color `color`
    #[inline]
    pub const fn en_passant(color: Color, from: Square, to: Square) -> Move {
        Move {
            captured: Some(Piece::Pawn),
            en_passant: true,
            ..Move::new(Piece::Pawn, color, from, to)
        }
    }

    /// Creates a castling move made by `color` towards `side`
    #[inline]
    pub fn castling(color: Color, side: CastlingSide) -> Move {
        Move {
            castling: Some(side),
            ..Move::new(
                Piece::King,
                color,
                castling::king_src(color),
                castling::king_dst(color, side),
            )
        }
    }

    #[inline]
    pub const fn with_capture(self, captured: Piece) -> Move {
        Move {
            captured: Some(captured),
            ..self
        }
    }

    #[inline]
    pub const fn with_promote(self, promote: PromotePiece) -> Move {
        Move {
            promote: Some(promote),
            ..self
        }
    }

    #[inline]
    pub const fn with_check(self, check: bool) -> Move {
        Move { check, ..self }
    }

    #[inline]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[inline]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    pub const fn promote(&self) -> Option<PromotePiece> {
        self.promote
    }

    #[inline]
    pub const fn castling_side(&self) -> Option<CastlingSide> {
        self.castling
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.en_passant
    }

    #[inline]
    pub const fn is_castling(&self) -> bool {
        self.castling.is_some()
    }

    /// Returns `true` if the move gives check
    #[inline]
    pub const fn is_check(&self) -> bool {
        self.check
    }

    /// Piece standing on `to` after the move
    #[inline]
    pub const fn placed_piece(&self) -> Piece {
        match self.promote {
            Some(p) => p.piece(),
            None => self.piece,
        }
    }

    /// Square of the captured piece
    ///
    /// Differs from [`Move::to()`] only for en passant.
    #[inline]
    pub fn capture_square(&self) -> Square {
        if self.en_passant {
            Square::from_parts(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }

    /// Rook step `(from, to)` for a castling move
    #[inline]
    pub fn castling_rook(&self) -> Option<(Square, Square)> {
        let side = self.castling?;
        Some((
            castling::rook_src(self.color, side),
            castling::rook_dst(self.color, side),
        ))
    }

    /// Returns the UCI representation of the move
    #[inline]
    pub fn uci(&self) -> uci::Move {
        uci::Move {
            src: self.from,
            dst: self.to,
            promote: self.promote,
        }
    }

    /// Finds the legal move in `pos` matching the UCI string `s`
    #[inline]
    pub fn from_uci(s: &str, pos: &Position) -> Result<Move, uci::ParseError> {
        uci::Move::from_str(s)?.into_move(pos)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.castling {
            Some(CastlingSide::King) => write!(f, "O-O")?,
            Some(CastlingSide::Queen) => write!(f, "O-O-O")?,
            None => {
                if self.piece != Piece::Pawn {
                    write!(f, "{}", self.piece.as_char())?;
                }
                let sep = if self.is_capture() { 'x' } else { '-' };
                write!(f, "{}{}{}", self.from, sep, self.to)?;
                if let Some(p) = self.promote {
                    write!(f, "={}", p.piece().as_char())?;
                }
            }
        }
        if self.check {
            write!(f, "+")?;
        }
        Ok(())
    }
}
