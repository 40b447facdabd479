use crate::types::{CastlingRights, Cell, Square};

include!(concat!(env!("OUT_DIR"), "/zobrist.rs"));

#[inline]
pub fn pieces(cell: Cell, sq: Square) -> u64 {
    unsafe { *PIECES.get_unchecked(cell.index()).get_unchecked(sq.index()) }
}

/// Key for the en passant target square
#[inline]
pub fn enpassant(sq: Square) -> u64 {
    unsafe { *ENPASSANT.get_unchecked(sq.index()) }
}

#[inline]
pub fn castling(rights: CastlingRights) -> u64 {
    unsafe { *CASTLING.get_unchecked(rights.index()) }
}
