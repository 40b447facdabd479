use crate::types::Square;
use std::fmt;

/// One of the eight sliding directions
///
/// Rays pointing towards larger square indices (`N`, `E`, `NE`, `NW`) are called increasing.
/// On an increasing ray, the nearest blocker is the lowest set bit; on a decreasing one it is
/// the highest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ray {
    N = 0,
    S = 1,
    E = 2,
    W = 3,
    NE = 4,
    NW = 5,
    SE = 6,
    SW = 7,
}

impl Ray {
    pub const COUNT: usize = 8;

    pub const ALL: [Ray; Ray::COUNT] = [
        Ray::N,
        Ray::S,
        Ray::E,
        Ray::W,
        Ray::NE,
        Ray::NW,
        Ray::SE,
        Ray::SW,
    ];

    #[inline]
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    #[inline]
    pub const fn from_index(val: usize) -> Ray {
        assert!(val < Self::COUNT, "ray index must be between 0 and 7");
        Self::ALL[val]
    }

    /// Returns `(delta_file, delta_rank)` of a single step
    pub const fn offset(&self) -> (isize, isize) {
        match *self {
            Ray::N => (0, 1),
            Ray::S => (0, -1),
            Ray::E => (1, 0),
            Ray::W => (-1, 0),
            Ray::NE => (1, 1),
            Ray::NW => (-1, 1),
            Ray::SE => (1, -1),
            Ray::SW => (-1, -1),
        }
    }

    /// Index delta of a single step
    pub const fn delta(&self) -> isize {
        let (df, dr) = self.offset();
        dr * 8 + df
    }

    pub const fn is_diagonal(&self) -> bool {
        matches!(*self, Ray::NE | Ray::NW | Ray::SE | Ray::SW)
    }

    pub const fn is_increasing(&self) -> bool {
        self.delta() > 0
    }

    pub const fn opposite(&self) -> Ray {
        match *self {
            Ray::N => Ray::S,
            Ray::S => Ray::N,
            Ray::E => Ray::W,
            Ray::W => Ray::E,
            Ray::NE => Ray::SW,
            Ray::NW => Ray::SE,
            Ray::SE => Ray::NW,
            Ray::SW => Ray::NE,
        }
    }

    /// Iterates over the squares along the ray starting from `sq`, excluding `sq` itself
    pub fn squares_from(self, sq: Square) -> impl Iterator<Item = Square> + Clone {
        let (df, dr) = self.offset();
        let mut cur = Some(sq);
        std::iter::from_fn(move || {
            cur = cur?.try_shift(df, dr);
            cur
        })
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match *self {
            Ray::N => "N",
            Ray::S => "S",
            Ray::E => "E",
            Ray::W => "W",
            Ray::NE => "NE",
            Ray::NW => "NW",
            Ray::SE => "SE",
            Ray::SW => "SW",
        };
        write!(f, "{}", s)
    }
}
