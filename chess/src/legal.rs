//! King safety

use crate::attack;
use crate::bitboard::Bitboard;
use crate::moves::Move;
use crate::position::{PieceSet, Position};
use crate::ray::Ray;
use crate::types::{Color, Piece, Square};

fn slider_on_ray(r: Ray, king: Square, occupied: Bitboard, enemy: &PieceSet) -> bool {
    match attack::first_blocker(r, king, occupied) {
        Some(b) => enemy.sliders(r.is_diagonal()).has(b),
        None => false,
    }
}

/// Returns `true` if the king of color `color` standing on `king` is attacked
///
/// `friendly` is the occupancy of the king's side, including the king itself. If `single_ray` is
/// given, only a slider attack along this ray is considered; the caller guarantees that no other
/// attack is possible.
pub fn is_king_in_check(
    king: Square,
    color: Color,
    friendly: Bitboard,
    enemy: &PieceSet,
    single_ray: Option<Ray>,
) -> bool {
    let occupied = friendly | enemy.occupancy();
    if let Some(r) = single_ray {
        return slider_on_ray(r, king, occupied, enemy);
    }

    if (attack::pawn(color, king) & enemy.get(Piece::Pawn)).is_nonempty()
        || (attack::knight(king) & enemy.get(Piece::Knight)).is_nonempty()
        || (attack::king(king) & enemy.get(Piece::King)).is_nonempty()
    {
        return true;
    }

    Ray::ALL
        .into_iter()
        .any(|r| slider_on_ray(r, king, occupied, enemy))
}

/// Returns `true` if making `mv` leaves the moving side's king attacked
///
/// The move must be pseudo-legal, i.e. it obeys how the piece moves, and must not capture a king.
pub fn is_king_in_check_after_move(pos: &Position, mv: Move) -> bool {
    let us = mv.color();
    let mut friendly = pos.color(us).without(mv.from()).with(mv.to());
    if let Some((src, dst)) = mv.castling_rook() {
        friendly = friendly.without(src).with(dst);
    }
    let mut enemy = pos.piece_set(us.inv());
    if mv.is_capture() {
        enemy.remove(mv.capture_square());
    }

    let king = if mv.piece() == Piece::King {
        mv.to()
    } else {
        pos.king(us)
    };

    // If we were safe before, only a slider behind the vacated square can reach the king now.
    // En passant vacates two squares, so it takes the full scan.
    let single_ray = if mv.piece() != Piece::King
        && !mv.is_en_passant()
        && pos.checkers().is_empty()
    {
        match attack::ray_between(king, mv.from()) {
            Some(r) => Some(r),
            None => return false,
        }
    } else {
        None
    };

    is_king_in_check(king, us, friendly, &enemy, single_ray)
}
