//! Detection of checks given by moves
//!
//! Direct checks are found with a table lookup from the destination square. Discovered checks are
//! found by looking along the ray from the enemy king through the vacated square. Their status
//! depends only on the occupancy, so it's memoized in [`CheckCache`] for the duration of a single
//! move generation call.

use crate::bitboard::Bitboard;
use crate::movegen::PieceMoves;
use crate::moves::Move;
use crate::position::Position;
use crate::ray::Ray;
use crate::types::{Piece, Square};
use crate::{attack, legal};

/// What happens to the enemy king if the piece on a given square leaves it
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    /// Not computed yet
    #[default]
    Unknown,
    /// The square doesn't shield the enemy king from any of our sliders
    NotCheck,
    /// The square is the only blocker between the enemy king and our slider
    Check,
    /// The square and the next piece behind it are the only blockers between the enemy king and
    /// our slider, so the check is given only if both of them disappear
    CheckIfCapture,
}

/// Memoized [`CheckState`] per square and per ray from the enemy king
///
/// Valid only for the position it was created for.
#[derive(Debug, Clone)]
pub struct CheckCache {
    enemy_king: Square,
    states: [[CheckState; Ray::COUNT]; 64],
}

impl CheckCache {
    pub fn new(pos: &Position) -> CheckCache {
        CheckCache {
            enemy_king: pos.king(pos.side().inv()),
            states: [[CheckState::Unknown; Ray::COUNT]; 64],
        }
    }

    #[inline]
    pub fn get(&self, sq: Square, r: Ray) -> CheckState {
        self.states[sq.index()][r.index()]
    }

    fn compute(&self, pos: &Position, sq: Square, r: Ray) -> CheckState {
        let occupied = pos.all();
        if attack::first_blocker(r, self.enemy_king, occupied) != Some(sq) {
            return CheckState::NotCheck;
        }
        let sliders = pos.piece_set(pos.side()).sliders(r.is_diagonal());
        let Some(next) = attack::first_blocker(r, sq, occupied) else {
            return CheckState::NotCheck;
        };
        if sliders.has(next) {
            return CheckState::Check;
        }
        match attack::first_blocker(r, next, occupied) {
            Some(beyond) if sliders.has(beyond) => CheckState::CheckIfCapture,
            _ => CheckState::NotCheck,
        }
    }

    /// Returns the ray from the enemy king through `sq` and the state for it
    ///
    /// If `store` is `false`, a missing state is computed but not remembered.
    pub fn discover(&mut self, pos: &Position, sq: Square, store: bool) -> Option<(Ray, CheckState)> {
        let r = attack::ray_between(self.enemy_king, sq)?;
        let mut state = self.get(sq, r);
        if state == CheckState::Unknown {
            state = self.compute(pos, sq, r);
            if store {
                self.states[sq.index()][r.index()] = state;
            }
        }
        Some((r, state))
    }
}

/// Returns `true` if the legal move `mv` gives check in `pos`
pub fn gives_check(pos: &Position, cache: &mut CheckCache, mv: Move) -> bool {
    let us = mv.color();
    let enemy_king = pos.king(us.inv());

    if let Some((src, dst)) = mv.castling_rook() {
        let mut ours = pos.piece_set(us);
        ours.pieces[Piece::King.index()] = Bitboard::from_square(mv.to());
        ours.pieces[Piece::Rook.index()].unset(src);
        ours.pieces[Piece::Rook.index()].set(dst);
        return legal::is_king_in_check(enemy_king, us.inv(), pos.color(us.inv()), &ours, None);
    }

    let occupied = pos
        .all()
        .without(mv.from())
        .without(mv.capture_square())
        .with(mv.to());
    if mv
        .placed_piece()
        .attacks_square(mv.to(), enemy_king, us, occupied)
    {
        return true;
    }

    let store = mv.promote().is_none();
    let blocks = |r: Ray| attack::ray(r, enemy_king).has(mv.to());

    match cache.discover(pos, mv.from(), store) {
        Some((r, CheckState::Check)) if !blocks(r) => return true,
        Some((r, CheckState::CheckIfCapture)) if mv.is_en_passant() && !blocks(r) => {
            if attack::first_blocker(r, mv.from(), pos.all()) == Some(mv.capture_square()) {
                return true;
            }
        }
        _ => {}
    }

    if mv.is_en_passant() {
        let victim = mv.capture_square();
        match cache.discover(pos, victim, store) {
            Some((r, CheckState::Check)) if !blocks(r) => return true,
            Some((r, CheckState::CheckIfCapture)) if !blocks(r) => {
                if attack::first_blocker(r, victim, pos.all()) == Some(mv.from()) {
                    return true;
                }
            }
            _ => {}
        }
    }

    false
}
