//! Precomputed attack tables and the first-blocker ray algorithm

use crate::bitboard::Bitboard;
use crate::ray::Ray;
use crate::types::{Color, Piece, Square};

#[inline]
const fn bb(val: u64) -> Bitboard {
    Bitboard::from_raw(val)
}

include!(concat!(env!("OUT_DIR"), "/near_attacks.rs"));
include!(concat!(env!("OUT_DIR"), "/rays.rs"));

/// All squares along `r` starting after `sq`, ignoring blockers
#[inline]
pub fn ray(r: Ray, sq: Square) -> Bitboard {
    unsafe { *RAYS.get_unchecked(r.index()).get_unchecked(sq.index()) }
}

/// Nearest occupied square along `r` from `sq`
#[inline]
pub fn first_blocker(r: Ray, sq: Square, occupied: Bitboard) -> Option<Square> {
    let blockers = ray(r, sq) & occupied;
    if r.is_increasing() {
        blockers.lowest()
    } else {
        blockers.highest()
    }
}

/// Squares attacked along `r` from `sq`, including the first blocker
#[inline]
pub fn ray_attacks(r: Ray, sq: Square, occupied: Bitboard) -> Bitboard {
    let full = ray(r, sq);
    match first_blocker(r, sq, occupied) {
        Some(b) => full ^ ray(r, b),
        None => full,
    }
}

pub const DIAGONAL: [Ray; 4] = [Ray::NE, Ray::NW, Ray::SE, Ray::SW];
pub const ORTHOGONAL: [Ray; 4] = [Ray::N, Ray::S, Ray::E, Ray::W];

/// Rays along which a slider of kind `p` moves
pub fn slider_rays(p: Piece) -> &'static [Ray] {
    match p {
        Piece::Bishop => &DIAGONAL,
        Piece::Rook => &ORTHOGONAL,
        Piece::Queen => &Ray::ALL,
        _ => &[],
    }
}

pub fn bishop(sq: Square, occupied: Bitboard) -> Bitboard {
    DIAGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &r| acc | ray_attacks(r, sq, occupied))
}

pub fn rook(sq: Square, occupied: Bitboard) -> Bitboard {
    ORTHOGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &r| acc | ray_attacks(r, sq, occupied))
}

#[inline]
pub fn queen(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop(sq, occupied) | rook(sq, occupied)
}

/// Ray leading from `src` to `dst`, if they share a rank, file or diagonal
#[inline]
pub fn ray_between(src: Square, dst: Square) -> Option<Ray> {
    let r = unsafe { *RAY_BETWEEN.get_unchecked(src.index()).get_unchecked(dst.index()) };
    if r == NO_RAY {
        return None;
    }
    Some(Ray::from_index(r as usize))
}

/// Squares strictly between `src` and `dst`, or empty if they are not collinear
#[inline]
pub fn between(src: Square, dst: Square) -> Bitboard {
    match ray_between(src, dst) {
        Some(r) => ray(r, src) & !ray(r, dst).with(dst),
        None => Bitboard::EMPTY,
    }
}

/// Full line through `sq` along `r` in both directions, excluding `sq` itself
#[inline]
pub fn line(r: Ray, sq: Square) -> Bitboard {
    ray(r, sq) | ray(r.opposite(), sq)
}

#[inline]
pub fn king(sq: Square) -> Bitboard {
    unsafe { *KING_ATTACKS.get_unchecked(sq.index()) }
}

#[inline]
pub fn knight(sq: Square) -> Bitboard {
    unsafe { *KNIGHT_ATTACKS.get_unchecked(sq.index()) }
}

/// Squares attacked by a pawn of color `color` standing on `sq`
#[inline]
pub fn pawn(color: Color, sq: Square) -> Bitboard {
    match color {
        Color::White => unsafe { *WHITE_PAWN_ATTACKS.get_unchecked(sq.index()) },
        Color::Black => unsafe { *BLACK_PAWN_ATTACKS.get_unchecked(sq.index()) },
    }
}

/// Attacks of a piece of kind `p` and color `color` on `sq`
pub fn piece(color: Color, p: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match p {
        Piece::Pawn => pawn(color, sq),
        Piece::Knight => knight(sq),
        Piece::Bishop => bishop(sq, occupied),
        Piece::Rook => rook(sq, occupied),
        Piece::Queen => queen(sq, occupied),
        Piece::King => king(sq),
    }
}
