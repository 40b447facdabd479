//! Legal move generation
//!
//! Pins and check restrictions are computed once per call in [`GenContext`], so the generators for
//! pawns, knights and sliders emit only legal moves without trying them. King moves and en passant
//! captures are verified with [`crate::legal::is_king_in_check_after_move()`]. Each emitted move is tagged
//! with its check flag.

mod king;
mod knight;
mod pawn;
mod slider;

use crate::attack;
use crate::bitboard::Bitboard;
use crate::check::{self, CheckCache};
use crate::moves::Move;
use crate::position::Position;
use crate::ray::Ray;
use crate::types::{Color, Piece, Square};

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// Sink for generated moves which may stop the generation by returning an error
pub trait MaybeMovePush {
    type Err;

    fn push(&mut self, m: Move) -> Result<(), Self::Err>;
}

#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, 256>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl<T: MovePush> MaybeMovePush for T {
    type Err = Infallible;

    fn push(&mut self, m: Move) -> Result<(), Self::Err> {
        <Self as MovePush>::push(self, m);
        Ok(())
    }
}

/// Pieces of the side to move pinned to their own king
#[derive(Debug, Clone)]
pub struct Pins {
    pinned: Bitboard,
    rays: [Option<Ray>; 64],
}

impl Pins {
    /// Finds the pieces of color `side` pinned to the king on `king`
    pub fn find(pos: &Position, side: Color, king: Square) -> Pins {
        let mut res = Pins {
            pinned: Bitboard::EMPTY,
            rays: [None; 64],
        };
        let ours = pos.color(side);
        let enemy = pos.piece_set(side.inv());
        for r in Ray::ALL {
            let Some(first) = attack::first_blocker(r, king, pos.all()) else {
                continue;
            };
            if !ours.has(first) {
                continue;
            }
            let Some(second) = attack::first_blocker(r, first, pos.all()) else {
                continue;
            };
            if enemy.sliders(r.is_diagonal()).has(second) {
                res.pinned.set(first);
                res.rays[first.index()] = Some(r);
            }
        }
        res
    }

    #[inline]
    pub fn pinned(&self) -> Bitboard {
        self.pinned
    }

    /// Ray from the king towards the pinned piece on `sq`
    #[inline]
    pub fn ray(&self, sq: Square) -> Option<Ray> {
        self.rays[sq.index()]
    }
}

/// Data shared by all the piece generators within a single generation call
pub struct GenContext<'a> {
    pub pos: &'a Position,
    pub side: Color,
    pub king: Square,
    pub us: Bitboard,
    pub them: Bitboard,
    pub all: Bitboard,
    pub checkers: Bitboard,
    /// Squares a non-king move may land on to resolve the current check
    pub block: Bitboard,
    pub pins: Pins,
    cache: CheckCache,
}

impl<'a> GenContext<'a> {
    pub fn new(pos: &'a Position) -> GenContext<'a> {
        let side = pos.side();
        let king = pos.king(side);
        let checkers = pos.checkers();
        let block = match (checkers.lowest(), checkers.popcount()) {
            (None, _) => Bitboard::FULL,
            (Some(c), 1) => checkers | attack::between(king, c),
            _ => Bitboard::EMPTY,
        };
        GenContext {
            pos,
            side,
            king,
            us: pos.color(side),
            them: pos.color(side.inv()),
            all: pos.all(),
            checkers,
            block,
            pins: Pins::find(pos, side, king),
            cache: CheckCache::new(pos),
        }
    }

    /// Destinations available to a non-king piece on `from`, ignoring how this piece moves
    #[inline]
    pub fn allowed(&self, from: Square) -> Bitboard {
        let pin = match self.pins.ray(from) {
            Some(r) => attack::line(r, self.king),
            None => Bitboard::FULL,
        };
        self.block & pin & !self.us
    }

    /// Builds a move of `piece` from `from` to `to`, capturing whatever stands on `to`
    #[inline]
    pub fn simple(&self, piece: Piece, from: Square, to: Square) -> Move {
        let mv = Move::new(piece, self.side, from, to);
        match self.pos.get(to).piece() {
            Some(captured) => mv.with_capture(captured),
            None => mv,
        }
    }

    /// Tags `mv` with its check flag and pushes it into `dst`
    #[inline]
    pub fn emit<P: MaybeMovePush>(&mut self, dst: &mut P, mv: Move) -> Result<(), P::Err> {
        let check = check::gives_check(self.pos, &mut self.cache, mv);
        dst.push(mv.with_check(check))
    }
}

/// Move generation and attack queries for a piece kind
pub trait PieceMoves {
    /// Emits all the legal moves of this piece kind for the side to move
    fn find_moves<P: MaybeMovePush>(self, ctx: &mut GenContext<'_>, dst: &mut P) -> Result<(), P::Err>;

    /// Returns `true` if the piece of color `color` on `from` attacks `target`
    fn attacks_square(self, from: Square, target: Square, color: Color, occupied: Bitboard) -> bool;
}

impl PieceMoves for Piece {
    fn find_moves<P: MaybeMovePush>(self, ctx: &mut GenContext<'_>, dst: &mut P) -> Result<(), P::Err> {
        match self {
            Piece::Pawn => pawn::find_moves(ctx, dst),
            Piece::Knight => knight::find_moves(ctx, dst),
            Piece::Bishop | Piece::Rook | Piece::Queen => slider::find_moves(self, ctx, dst),
            Piece::King => king::find_moves(ctx, dst),
        }
    }

    #[inline]
    fn attacks_square(self, from: Square, target: Square, color: Color, occupied: Bitboard) -> bool {
        attack::piece(color, self, from, occupied).has(target)
    }
}

fn gen_all<P: MaybeMovePush>(pos: &Position, dst: &mut P) -> Result<(), P::Err> {
    let mut ctx = GenContext::new(pos);
    if ctx.block.is_empty() {
        // Double check, only the king can move
        return Piece::King.find_moves(&mut ctx, dst);
    }
    for p in Piece::ALL {
        p.find_moves(&mut ctx, dst)?;
    }
    Ok(())
}

/// Pushes all the legal moves into `dst`
pub fn legal_moves_into<P: MovePush>(pos: &Position, dst: &mut P) {
    let _ = gen_all(pos, dst);
}

/// Returns all the legal moves
pub fn legal_moves(pos: &Position) -> MoveList {
    let mut res = MoveList::new();
    legal_moves_into(pos, &mut res);
    #[cfg(feature = "selftest")]
    selftest(pos, &res);
    res
}

struct ErrOnFirst;

impl MaybeMovePush for ErrOnFirst {
    type Err = ();

    fn push(&mut self, _mv: Move) -> Result<(), ()> {
        Err(())
    }
}

pub fn has_legal_moves(pos: &Position) -> bool {
    gen_all(pos, &mut ErrOnFirst).is_err()
}

#[cfg(feature = "selftest")]
fn selftest(pos: &Position, moves: &MoveList) {
    for mv in moves {
        let next = pos.make_move(*mv);
        assert!(
            !next.is_opponent_king_attacked(),
            "move {} leaves the king attacked in {}",
            mv,
            pos
        );
        assert_eq!(
            mv.is_check(),
            next.is_check(),
            "bad check flag for {} in {}",
            mv,
            pos
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::PromotePiece;
    use crate::types::CastlingSide;
    use crate::{bitboard_consts, castling, geometry};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    fn uci_set(pos: &Position) -> BTreeSet<String> {
        pos.legal_moves()
            .iter()
            .map(|mv| mv.uci().to_string())
            .collect()
    }

    fn moves_from(pos: &Position, from: &str) -> BTreeSet<String> {
        pos.legal_moves()
            .iter()
            .filter(|mv| mv.from() == sq(from))
            .map(|mv| mv.uci().to_string())
            .collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Legal moves found by trying every pseudo-legal move and rescanning the whole board
    fn brute_force(pos: &Position) -> BTreeSet<String> {
        let us = pos.side();
        let forward = geometry::pawn_forward_delta(us);
        let mut candidates = Vec::new();
        for from in pos.color(us) {
            let Some(piece) = pos.get(from).piece() else {
                continue;
            };
            let targets = if piece == Piece::Pawn {
                let mut t = attack::pawn(us, from) & pos.color(us.inv());
                let one = from.add(forward);
                if !pos.all().has(one) {
                    t.set(one);
                    if from.rank() == geometry::double_push_src_rank(us) {
                        let two = one.add(forward);
                        if !pos.all().has(two) {
                            t.set(two);
                        }
                    }
                }
                t
            } else {
                attack::piece(us, piece, from, pos.all()) & !pos.color(us)
            };
            for to in targets {
                let mv = Move::new(piece, us, from, to);
                let mv = match pos.get(to).piece() {
                    Some(Piece::King) => continue,
                    Some(p) => mv.with_capture(p),
                    None => mv,
                };
                if piece == Piece::Pawn && bitboard_consts::promote_rank(us).has(to) {
                    candidates.extend(PromotePiece::ALL.map(|p| mv.with_promote(p)));
                } else {
                    candidates.push(mv);
                }
            }
            if let Some(ep) = pos.ep() {
                if piece == Piece::Pawn && attack::pawn(us, from).has(ep) {
                    candidates.push(Move::en_passant(us, from, ep));
                }
            }
        }
        for s in [CastlingSide::King, CastlingSide::Queen] {
            if pos.castling().has(us, s)
                && (castling::pass(us, s) & pos.all()).is_empty()
                && castling::king_path(us, s)
                    .iter()
                    .all(|&p| !pos.is_square_attacked(p, us.inv()))
            {
                candidates.push(Move::castling(us, s));
            }
        }
        candidates
            .into_iter()
            .filter(|mv| !pos.make_move(*mv).is_opponent_king_attacked())
            .map(|mv| mv.uci().to_string())
            .collect()
    }

    #[test]
    fn test_initial() {
        let pos = Position::initial();
        let moves = pos.legal_moves();
        assert_eq!(moves.len(), 20);
        assert!(moves.iter().all(|mv| !mv.is_capture() && !mv.is_check()));
        assert!(pos.has_legal_moves());
    }

    #[test]
    fn test_kiwipete() {
        let pos =
            Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        let moves = pos.legal_moves();
        assert_eq!(moves.len(), 48);
        assert_eq!(moves.iter().filter(|mv| mv.is_capture()).count(), 8);
        assert_eq!(moves.iter().filter(|mv| mv.is_castling()).count(), 2);
    }

    #[test]
    fn test_pinned_knight() {
        let pos = Position::from_fen("4k3/8/8/8/1b6/8/3N4/4K3 w - - 0 1").unwrap();
        assert!(moves_from(&pos, "d2").is_empty());
        assert!(Pins::find(&pos, Color::White, sq("e1")).pinned().has(sq("d2")));
    }

    #[test]
    fn test_pinned_sliders() {
        let pos = Position::from_fen("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        assert_eq!(
            moves_from(&pos, "e2"),
            set(&["e2e3", "e2e4", "e2e5", "e2e6", "e2e7"])
        );

        let pos = Position::from_fen("7k/8/8/8/8/2b5/1B6/K7 w - - 0 1").unwrap();
        assert_eq!(moves_from(&pos, "b2"), set(&["b2c3"]));

        let pos = Position::from_fen("7k/8/8/8/8/2b5/1Q6/K7 w - - 0 1").unwrap();
        assert_eq!(moves_from(&pos, "b2"), set(&["b2c3"]));

        let pos = Position::from_fen("7k/8/8/8/8/2b5/1R6/K7 w - - 0 1").unwrap();
        assert!(moves_from(&pos, "b2").is_empty());
    }

    #[test]
    fn test_pinned_pawns() {
        // Pinned along the file, can push but not capture
        let pos = Position::from_fen("4r2k/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(moves_from(&pos, "e4"), set(&["e4e5"]));

        // Pinned along the diagonal, can only capture the pinner
        let pos = Position::from_fen("7k/8/8/8/8/2b5/3P4/4K3 w - - 0 1").unwrap();
        assert_eq!(moves_from(&pos, "d2"), set(&["d2c3"]));
    }

    #[test]
    fn test_pin_subsets() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mut pos = Position::initial();
            for _ in 0..60 {
                let king = pos.king(pos.side());
                let pins = Pins::find(&pos, pos.side(), king);
                for mv in pos.legal_moves().iter() {
                    if let Some(r) = pins.ray(mv.from()) {
                        assert!(attack::line(r, king).has(mv.to()), "{} in {}", mv, pos);
                    }
                }
                let moves = pos.legal_moves();
                let Some(&mv) = moves.choose(&mut rng) else {
                    break;
                };
                pos = pos.make_move(mv);
            }
        }
    }

    #[test]
    fn test_check_evasions() {
        // Single check by a rook: block, capture or step aside
        let pos = Position::from_fen("4k3/8/8/8/4r3/8/3B4/R3K3 w - - 0 1").unwrap();
        assert_eq!(uci_set(&pos), set(&["d2e3", "e1d1", "e1f1", "e1f2"]));

        // Double check, only king moves
        let pos = Position::from_fen("4k3/8/8/8/4r3/3n4/8/R3K3 w - - 0 1").unwrap();
        assert_eq!(pos.checkers().popcount(), 2);
        assert!(pos.legal_moves().iter().all(|mv| mv.piece() == Piece::King));
    }

    #[test]
    fn test_castling() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let castlings: Vec<_> = pos
            .legal_moves()
            .iter()
            .filter_map(|mv| mv.castling_side())
            .collect();
        assert_eq!(castlings, vec![CastlingSide::King, CastlingSide::Queen]);

        // f1 is attacked
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1").unwrap();
        assert!(uci_set(&pos).contains("e1c1"));
        assert!(!uci_set(&pos).contains("e1g1"));

        // In check
        let pos = Position::from_fen("r3k2r/8/8/8/4r3/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(!uci_set(&pos).contains("e1c1"));
        assert!(!uci_set(&pos).contains("e1g1"));

        // Only b1 is attacked, which doesn't matter
        let pos = Position::from_fen("r3k2r/8/8/8/8/n7/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(uci_set(&pos).contains("e1c1"));
        assert!(uci_set(&pos).contains("e1g1"));

        // Path is blocked
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        assert!(!uci_set(&pos).contains("e1c1"));
        assert!(uci_set(&pos).contains("e1g1"));

        // No rights
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1").unwrap();
        assert!(!uci_set(&pos).contains("e1c1"));
        assert!(uci_set(&pos).contains("e1g1"));
    }

    #[test]
    fn test_enpassant() {
        // Capturing would expose the own king along the rank
        let pos = Position::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2").unwrap();
        assert!(!uci_set(&pos).contains("e5d6"));

        let pos = Position::from_fen("8/8/8/3pP3/8/8/8/K6k w - d6 0 2").unwrap();
        let mv = Move::from_uci("e5d6", &pos).unwrap();
        assert!(mv.is_en_passant());
        assert_eq!(mv.capture_square(), sq("d5"));

        // Capturing the checking pawn en passant
        let pos = Position::from_fen("8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        assert!(pos.is_check());
        assert!(uci_set(&pos).contains("e4d3"));
    }

    #[test]
    fn test_promotions() {
        let pos = Position::from_fen("1b1b1K2/2P5/8/8/7k/8/8/8 w - - 0 1").unwrap();
        let promotes: Vec<_> = pos
            .legal_moves()
            .iter()
            .filter(|mv| mv.from() == sq("c7"))
            .map(|mv| mv.uci().to_string())
            .collect();
        assert_eq!(promotes.len(), 12);
        assert_eq!(&promotes[..4], &["c7c8r", "c7c8n", "c7c8b", "c7c8q"]);
    }

    #[test]
    fn test_against_brute_force() {
        let mut rng = StdRng::seed_from_u64(0xbeef);
        let mut fens = vec![
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1".to_string(),
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1".to_string(),
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1".to_string(),
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8".to_string(),
        ];
        for _ in 0..10 {
            let mut pos = Position::initial();
            for _ in 0..100 {
                let moves = pos.legal_moves();
                let Some(&mv) = moves.choose(&mut rng) else {
                    break;
                };
                pos = pos.make_move(mv);
                fens.push(pos.as_fen());
            }
        }

        for fen in &fens {
            let pos = Position::from_fen(fen).unwrap();
            let moves = pos.legal_moves();
            assert_eq!(uci_set(&pos), brute_force(&pos), "{}", fen);
            for mv in moves.iter() {
                let next = pos.make_move(*mv);
                assert!(!next.is_opponent_king_attacked(), "{} in {}", mv, fen);
                assert_eq!(mv.is_check(), next.is_check(), "{} in {}", mv, fen);
            }
            assert_eq!(pos.has_legal_moves(), !moves.is_empty());
        }
    }

    #[test]
    fn test_brute_force_promotions() {
        for fen in [
            "8/PPPPPPPP/8/2k1K3/8/8/pppppppp/8 w - - 0 1",
            "8/PPPPPPPP/8/2k1K3/8/8/pppppppp/8 b - - 0 1",
            "4k3/1P6/8/8/8/8/6p1/4K3 w - - 0 1",
            "4k3/1P6/8/8/8/8/6p1/4K3 b - - 0 1",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            let expected = brute_force(&pos);
            assert!(expected.iter().any(|mv| mv.len() == 5), "{}", fen);
            assert_eq!(uci_set(&pos), expected, "{}", fen);
        }
    }
}
