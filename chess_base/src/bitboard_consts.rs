use crate::bitboard::Bitboard;
use crate::types::{Color, File, Rank};

const RANK: [Bitboard; 8] = [
    Bitboard::from_raw(0x00000000000000ff),
    Bitboard::from_raw(0x000000000000ff00),
    Bitboard::from_raw(0x0000000000ff0000),
    Bitboard::from_raw(0x00000000ff000000),
    Bitboard::from_raw(0x000000ff00000000),
    Bitboard::from_raw(0x0000ff0000000000),
    Bitboard::from_raw(0x00ff000000000000),
    Bitboard::from_raw(0xff00000000000000),
];

pub const fn rank(r: Rank) -> Bitboard {
    RANK[r.index()]
}

const FILE: [Bitboard; 8] = [
    Bitboard::from_raw(0x0101010101010101),
    Bitboard::from_raw(0x0202020202020202),
    Bitboard::from_raw(0x0404040404040404),
    Bitboard::from_raw(0x0808080808080808),
    Bitboard::from_raw(0x1010101010101010),
    Bitboard::from_raw(0x2020202020202020),
    Bitboard::from_raw(0x4040404040404040),
    Bitboard::from_raw(0x8080808080808080),
];

pub const fn file(f: File) -> Bitboard {
    FILE[f.index()]
}

pub const fn not_file(f: File) -> Bitboard {
    Bitboard::from_raw(!FILE[f.index()].as_raw())
}

pub const fn not_rank(r: Rank) -> Bitboard {
    Bitboard::from_raw(!RANK[r.index()].as_raw())
}

/// Ranks on which a pawn can never stand
pub const PAWN_FORBIDDEN: Bitboard =
    Bitboard::from_raw(RANK[0].as_raw() | RANK[7].as_raw());

/// Rank a pawn of color `c` must reach to promote
pub const fn promote_rank(c: Color) -> Bitboard {
    match c {
        Color::White => RANK[7],
        Color::Black => RANK[0],
    }
}
