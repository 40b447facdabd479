//! Static evaluation

use crate::position::Position;
use crate::types::{Color, Piece, Square};

/// Position score in centipawns
pub type Score = i32;

/// Score of being checkmated at the root
///
/// A side mated after `ply` half-moves scores `-MATE + ply`, so shorter mates are preferred.
pub const MATE: Score = 1_000_000;

/// Bound wider than any reachable score
pub const INF: Score = MATE + 1;

/// Static evaluation used at the leaves of a search
pub trait Evaluator {
    /// Returns the score of `pos` from the point of view of the side to move
    fn evaluate(&self, pos: &Position) -> Score;
}

impl<F: Fn(&Position) -> Score> Evaluator for F {
    #[inline]
    fn evaluate(&self, pos: &Position) -> Score {
        self(pos)
    }
}

// Piece-square tables, as seen by White, rank 8 first.
#[rustfmt::skip]
const PAWN: [i16; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT: [i16; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP: [i16; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK: [i16; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN: [i16; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING: [i16; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

const TABLES: [&[i16; 64]; Piece::COUNT] = [&PAWN, &KNIGHT, &BISHOP, &ROOK, &QUEEN, &KING];

/// Bonus for piece `p` of color `c` standing on `sq`
#[inline]
pub fn square_value(c: Color, p: Piece, sq: Square) -> Score {
    // Tables start from a8, so White needs the rank flipped
    let idx = match c {
        Color::White => sq.flipped_rank().index(),
        Color::Black => sq.index(),
    };
    TABLES[p.index()][idx] as Score
}

/// Material plus piece-square tables
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Material;

impl Material {
    fn side_score(pos: &Position, c: Color) -> Score {
        let mut res = 0;
        for p in Piece::ALL {
            for sq in pos.piece2(c, p) {
                res += p.value() + square_value(c, p, sq);
            }
        }
        res
    }
}

impl Evaluator for Material {
    fn evaluate(&self, pos: &Position) -> Score {
        let side = pos.side();
        Material::side_score(pos, side) - Material::side_score(pos, side.inv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        let pos = Position::initial();
        assert_eq!(Material.evaluate(&pos), 0);
        let pos = pos.make_uci("e2e4").unwrap();
        assert_eq!(Material.evaluate(&pos), -40);
        let pos = pos.make_uci("e7e5").unwrap();
        assert_eq!(Material.evaluate(&pos), 0);
    }

    #[test]
    fn test_material() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let score = Material.evaluate(&pos);
        assert!(score > 800, "{}", score);
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        assert_eq!(Material.evaluate(&pos), -score);
    }

    #[test]
    fn test_square_value() {
        let e4 = "e4".parse::<Square>().unwrap();
        let e5 = "e5".parse::<Square>().unwrap();
        assert_eq!(square_value(Color::White, Piece::Pawn, e4), 20);
        assert_eq!(square_value(Color::Black, Piece::Pawn, e5), 20);
        let g1 = "g1".parse::<Square>().unwrap();
        let g8 = "g8".parse::<Square>().unwrap();
        assert_eq!(
            square_value(Color::White, Piece::King, g1),
            square_value(Color::Black, Piece::King, g8)
        );
    }
}
