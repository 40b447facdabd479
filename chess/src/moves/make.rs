//! Applying and reverting moves

use super::base::Move;
use super::uci;
use crate::position::Position;
use crate::types::{CastlingRights, Cell, Color, Piece, Square};
use crate::{castling, geometry, zobrist};

/// Metadata necessary to undo the applied move
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Undo {
    hash: u64,
    castling: CastlingRights,
    ep: Option<Square>,
    halfmove: u16,
    fullmove: u16,
}

impl Position {
    /// Applies `mv` in place and returns the data needed to revert it with [`Position::unmake_move()`]
    ///
    /// The move must be legal in this position.
    ///
    /// # Panics
    ///
    /// Panics if the moving piece is not on its source square, if the move captures an empty square,
    /// or if it captures a king.
    pub fn make_move_raw(&mut self, mv: Move) -> Undo {
        let us = mv.color();
        let undo = Undo {
            hash: self.hash,
            castling: self.r.castling,
            ep: self.r.ep,
            halfmove: self.r.halfmove,
            fullmove: self.r.fullmove,
        };

        let moving = Cell::from_parts(us, mv.piece());
        assert!(
            us == self.r.side && self.get(mv.from()) == moving,
            "no {:?} {:?} on {} to make {}",
            us,
            mv.piece(),
            mv.from(),
            mv
        );

        if let Some(p) = self.r.ep.take() {
            self.hash ^= zobrist::enpassant(p);
        }

        match mv.captured() {
            Some(captured) => {
                assert!(captured != Piece::King, "cannot capture a king with {}", mv);
                let removed = self.remove_piece(mv.capture_square());
                assert!(
                    removed == Cell::from_parts(us.inv(), captured),
                    "expected {:?} on {} to make {}, found {:?}",
                    captured,
                    mv.capture_square(),
                    mv,
                    removed
                );
            }
            None => assert!(
                self.get(mv.to()).is_empty(),
                "destination {} of {} is occupied",
                mv.to(),
                mv
            ),
        }

        self.remove_piece(mv.from());
        self.put_piece(mv.to(), Cell::from_parts(us, mv.placed_piece()));
        if let Some((src, dst)) = mv.castling_rook() {
            let rook = self.remove_piece(src);
            self.put_piece(dst, rook);
        }

        let mut rights = self.r.castling;
        if mv.piece() == Piece::King {
            rights.unset_color(us);
        }
        for sq in [mv.from(), mv.to()] {
            if let Some((c, s)) = castling::flag_for(sq) {
                rights.unset(c, s);
            }
        }
        self.hash ^= zobrist::castling(self.r.castling) ^ zobrist::castling(rights);
        self.r.castling = rights;

        if mv.piece() == Piece::Pawn
            && mv.from().rank() == geometry::double_push_src_rank(us)
            && mv.to().index().abs_diff(mv.from().index()) == 16
        {
            let ep = mv.from().add(geometry::pawn_forward_delta(us));
            self.r.ep = Some(ep);
            self.hash ^= zobrist::enpassant(ep);
        }

        if mv.piece() == Piece::Pawn || mv.is_capture() {
            self.r.halfmove = 0;
        } else {
            self.r.halfmove = self.r.halfmove.saturating_add(1);
        }
        if us == Color::Black {
            self.r.fullmove = self.r.fullmove.saturating_add(1);
        }
        self.r.side = us.inv();
        self.hash ^= zobrist::MOVE_SIDE;

        undo
    }

    /// Reverts `mv` previously applied with [`Position::make_move_raw()`]
    ///
    /// `u` must be the value returned when the move was made, and the position must not have been
    /// changed since then.
    pub fn unmake_move(&mut self, mv: Move, u: Undo) {
        let us = mv.color();
        if let Some((src, dst)) = mv.castling_rook() {
            let rook = self.remove_piece(dst);
            self.put_piece(src, rook);
        }
        self.remove_piece(mv.to());
        self.put_piece(mv.from(), Cell::from_parts(us, mv.piece()));
        if let Some(captured) = mv.captured() {
            self.put_piece(mv.capture_square(), Cell::from_parts(us.inv(), captured));
        }

        self.r.side = us;
        self.r.castling = u.castling;
        self.r.ep = u.ep;
        self.r.halfmove = u.halfmove;
        self.r.fullmove = u.fullmove;
        self.hash = u.hash;
    }
}

/// Something which can be turned into a legal move and applied to a position
pub trait Make {
    type Err;

    fn make_raw(&self, pos: &mut Position) -> Result<(Move, Undo), Self::Err>;

    fn make(&self, pos: &Position) -> Result<Position, Self::Err> {
        let mut copied = *pos;
        let _ = self.make_raw(&mut copied)?;
        Ok(copied)
    }
}

impl Make for Move {
    type Err = std::convert::Infallible;

    #[inline]
    fn make_raw(&self, pos: &mut Position) -> Result<(Move, Undo), Self::Err> {
        Ok((*self, pos.make_move_raw(*self)))
    }
}

/// Move given as a UCI string
pub struct Uci<S: AsRef<str>>(pub S);

impl<S: AsRef<str>> Make for Uci<S> {
    type Err = uci::ParseError;

    #[inline]
    fn make_raw(&self, pos: &mut Position) -> Result<(Move, Undo), Self::Err> {
        let mv = Move::from_uci(self.0.as_ref(), pos)?;
        Ok((mv, pos.make_move_raw(mv)))
    }
}
