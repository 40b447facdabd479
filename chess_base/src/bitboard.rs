use crate::bitboard_consts;
use crate::ray::Ray;
use crate::types::{File, Square};
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use std::fmt;
use std::iter::{FusedIterator, IntoIterator};

#[derive(
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    #[inline]
    pub const fn from_raw(val: u64) -> Bitboard {
        Bitboard(val)
    }

    #[inline]
    pub const fn from_square(sq: Square) -> Bitboard {
        Bitboard(1_u64 << sq.index())
    }

    #[inline]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | (1_u64 << sq.index()))
    }

    #[inline]
    pub const fn without(self, sq: Square) -> Bitboard {
        Bitboard(self.0 & !(1_u64 << sq.index()))
    }

    /// Shifts towards larger indices for positive `by`, towards smaller ones otherwise
    ///
    /// Bits leaving the board are dropped. No file masking is done here.
    #[inline]
    pub const fn shift(self, by: isize) -> Bitboard {
        if by >= 0 {
            Bitboard(self.0 << (by as u32))
        } else {
            Bitboard(self.0 >> ((-by) as u32))
        }
    }

    /// Moves every square one step along `ray`, dropping squares which would wrap around a board edge
    pub const fn step(self, ray: Ray) -> Bitboard {
        let masked = match ray {
            Ray::E | Ray::NE | Ray::SE => self.0 & bitboard_consts::not_file(File::H).0,
            Ray::W | Ray::NW | Ray::SW => self.0 & bitboard_consts::not_file(File::A).0,
            Ray::N | Ray::S => self.0,
        };
        Bitboard(masked).shift(ray.delta())
    }

    /// Knight jumps from every square of the bitboard
    pub const fn knight_jumps(self) -> Bitboard {
        let ab = bitboard_consts::file(File::A).0 | bitboard_consts::file(File::B).0;
        let gh = bitboard_consts::file(File::G).0 | bitboard_consts::file(File::H).0;
        let a = bitboard_consts::file(File::A).0;
        let h = bitboard_consts::file(File::H).0;
        let b = self.0;
        Bitboard(
            ((b & !h) << 17)
                | ((b & !a) << 15)
                | ((b & !gh) << 10)
                | ((b & !ab) << 6)
                | ((b & !a) >> 17)
                | ((b & !h) >> 15)
                | ((b & !ab) >> 10)
                | ((b & !gh) >> 6),
        )
    }

    /// King steps from every square of the bitboard
    pub const fn king_steps(self) -> Bitboard {
        let mut res = 0;
        let mut i = 0;
        while i < Ray::COUNT {
            res |= self.step(Ray::from_index(i)).0;
            i += 1;
        }
        Bitboard(res)
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        *self = self.with(sq);
    }

    #[inline]
    pub fn unset(&mut self, sq: Square) {
        *self = self.without(sq);
    }

    #[inline]
    pub const fn has(&self, sq: Square) -> bool {
        ((self.0 >> sq.index()) & 1) != 0
    }

    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn popcount(&self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    /// Square with the smallest index
    #[inline]
    pub fn lowest(&self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        Some(unsafe { Square::from_index_unchecked(self.0.trailing_zeros() as usize) })
    }

    /// Square with the largest index
    #[inline]
    pub fn highest(&self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        Some(unsafe { Square::from_index_unchecked(63 - self.0.leading_zeros() as usize) })
    }

    /// Nearest set square with index greater than `sq`
    pub fn next_after(&self, sq: Square) -> Option<Square> {
        let above = if sq.index() == 63 {
            0
        } else {
            self.0 & (!0_u64 << (sq.index() + 1))
        };
        Bitboard(above).lowest()
    }

    /// Nearest set square with index less than `sq`
    pub fn prev_before(&self, sq: Square) -> Option<Square> {
        let below = self.0 & ((1_u64 << sq.index()) - 1);
        Bitboard(below).highest()
    }

    /// Returns `true` if exactly one square is set
    #[inline]
    pub const fn is_single(&self) -> bool {
        self.0 != 0 && (self.0 & (self.0 - 1)) == 0
    }
}

impl From<Bitboard> for u64 {
    fn from(b: Bitboard) -> u64 {
        b.0
    }
}

impl From<u64> for Bitboard {
    fn from(u: u64) -> Bitboard {
        Bitboard(u)
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard::from_square(sq)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Bitboard({})", self)
    }
}

/// Prints the ranks from 8 down to 1, file `a` first in each rank
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in (0..8).rev() {
            let row = ((self.0 >> (rank * 8)) & 0xff) as u8;
            write!(f, "{:08b}", row.reverse_bits())?;
            if rank != 0 {
                write!(f, "/")?;
            }
        }
        Ok(())
    }
}

/// Iterates over the set squares in ascending order; also double-ended
#[derive(Clone)]
pub struct Iter(u64);

impl Iterator for Iter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0.wrapping_sub(1_u64);
        unsafe { Some(Square::from_index_unchecked(bit as usize)) }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Iter {
    #[inline]
    fn next_back(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let bit = 63 - self.0.leading_zeros();
        self.0 &= !(1_u64 << bit);
        unsafe { Some(Square::from_index_unchecked(bit as usize)) }
    }
}

impl ExactSizeIterator for Iter {}

impl FusedIterator for Iter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Iter;

    #[inline]
    fn into_iter(self) -> Iter {
        Iter(self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, Bitboard::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rank;
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    #[test]
    fn test_iter() {
        let bb = Bitboard::EMPTY
            .with(sq("a4"))
            .with(sq("e2"))
            .with(sq("f3"));
        assert_eq!(
            bb.into_iter().collect::<Vec<_>>(),
            vec![sq("e2"), sq("f3"), sq("a4")],
        );
        assert_eq!(
            bb.into_iter().rev().collect::<Vec<_>>(),
            vec![sq("a4"), sq("f3"), sq("e2")],
        );
        assert_eq!(bb.into_iter().len(), 3);
        assert_eq!(bb.into_iter().collect::<Bitboard>(), bb);
    }

    #[test]
    fn test_bitops() {
        let ca = sq("a4");
        let cb = sq("e2");
        let cc = sq("f3");

        let bb1 = Bitboard::EMPTY.with(ca).with(cb);
        let bb2 = Bitboard::EMPTY.with(cb).with(cc);
        assert_eq!(bb1 & bb2, Bitboard::EMPTY.with(cb));
        assert_eq!(bb1 | bb2, Bitboard::EMPTY.with(ca).with(cb).with(cc));
        assert_eq!(bb1 ^ bb2, Bitboard::EMPTY.with(ca).with(cc));

        assert_eq!((!bb1).into_iter().count(), 62);
        assert_eq!((!bb1).popcount(), 62);
    }

    #[test]
    fn test_lowest_highest() {
        let bb = Bitboard::EMPTY
            .with(sq("c2"))
            .with(sq("d4"))
            .with(sq("g7"));
        assert_eq!(bb.lowest(), Some(sq("c2")));
        assert_eq!(bb.highest(), Some(sq("g7")));
        assert_eq!(bb.next_after(sq("c2")), Some(sq("d4")));
        assert_eq!(bb.next_after(sq("a1")), Some(sq("c2")));
        assert_eq!(bb.next_after(sq("g7")), None);
        assert_eq!(bb.next_after(sq("h8")), None);
        assert_eq!(bb.prev_before(sq("g7")), Some(sq("d4")));
        assert_eq!(bb.prev_before(sq("c2")), None);
        assert_eq!(bb.prev_before(sq("a1")), None);
        assert_eq!(Bitboard::EMPTY.lowest(), None);
        assert_eq!(Bitboard::EMPTY.highest(), None);
        assert!(Bitboard::from_square(sq("h8")).is_single());
        assert!(!bb.is_single());
        assert!(!Bitboard::EMPTY.is_single());
    }

    #[test]
    fn test_step() {
        let h4 = Bitboard::from_square(sq("h4"));
        assert_eq!(h4.step(Ray::E), Bitboard::EMPTY);
        assert_eq!(h4.step(Ray::NE), Bitboard::EMPTY);
        assert_eq!(h4.step(Ray::W), Bitboard::from_square(sq("g4")));
        assert_eq!(h4.step(Ray::N), Bitboard::from_square(sq("h5")));

        let a8 = Bitboard::from_square(sq("a8"));
        assert_eq!(a8.step(Ray::N), Bitboard::EMPTY);
        assert_eq!(a8.step(Ray::NW), Bitboard::EMPTY);
        assert_eq!(a8.step(Ray::SW), Bitboard::EMPTY);
        assert_eq!(a8.step(Ray::SE), Bitboard::from_square(sq("b7")));

        let rank = bitboard_consts::rank(Rank::R2);
        assert_eq!(rank.step(Ray::N), bitboard_consts::rank(Rank::R3));
        assert_eq!(rank.step(Ray::E).popcount(), 7);
    }

    #[test]
    fn test_jumps() {
        assert_eq!(
            Bitboard::from_square(sq("a1")).knight_jumps(),
            Bitboard::EMPTY.with(sq("b3")).with(sq("c2")),
        );
        assert_eq!(Bitboard::from_square(sq("d4")).knight_jumps().popcount(), 8);
        assert_eq!(Bitboard::from_square(sq("h8")).knight_jumps().popcount(), 2);
        assert_eq!(Bitboard::from_square(sq("g2")).knight_jumps().popcount(), 4);
        assert_eq!(
            Bitboard::from_square(sq("h1")).king_steps(),
            Bitboard::EMPTY.with(sq("g1")).with(sq("g2")).with(sq("h2")),
        );
        assert_eq!(Bitboard::from_square(sq("e4")).king_steps().popcount(), 8);
    }

    #[test]
    fn test_format() {
        let bb = Bitboard::EMPTY
            .with(sq("a4"))
            .with(sq("e2"))
            .with(sq("f3"))
            .with(sq("h8"));
        assert_eq!(
            bb.to_string(),
            "00000001/00000000/00000000/00000000/10000000/00000100/00001000/00000000"
        );
    }
}
