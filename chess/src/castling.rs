//! Castling geometry

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::types::{CastlingSide, Color, File, Square};

/// Squares which must be empty to castle
pub fn pass(c: Color, s: CastlingSide) -> Bitboard {
    let rank = geometry::castling_rank(c);
    let files: &[File] = match s {
        CastlingSide::King => &[File::F, File::G],
        CastlingSide::Queen => &[File::B, File::C, File::D],
    };
    files
        .iter()
        .map(|&f| Square::from_parts(f, rank))
        .collect()
}

/// Squares the king stands on or crosses, none of which may be attacked
pub fn king_path(c: Color, s: CastlingSide) -> [Square; 3] {
    let rank = geometry::castling_rank(c);
    let files = match s {
        CastlingSide::King => [File::E, File::F, File::G],
        CastlingSide::Queen => [File::E, File::D, File::C],
    };
    files.map(|f| Square::from_parts(f, rank))
}

#[inline]
pub fn king_src(c: Color) -> Square {
    Square::from_parts(File::E, geometry::castling_rank(c))
}

#[inline]
pub fn king_dst(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Square::from_parts(file, geometry::castling_rank(c))
}

#[inline]
pub fn rook_src(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    };
    Square::from_parts(file, geometry::castling_rank(c))
}

#[inline]
pub fn rook_dst(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Square::from_parts(file, geometry::castling_rank(c))
}

/// Castling flag lost when a piece leaves or is captured on `sq`
pub fn flag_for(sq: Square) -> Option<(Color, CastlingSide)> {
    for c in [Color::White, Color::Black] {
        for s in [CastlingSide::King, CastlingSide::Queen] {
            if rook_src(c, s) == sq {
                return Some((c, s));
            }
        }
    }
    None
}
