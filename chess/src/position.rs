//! Position and related things

use crate::bitboard::Bitboard;
use crate::moves::{self, Move};
use crate::types::{
    self, CastlingRights, CastlingSide, Cell, Color, File, Piece, Rank, Square,
};
use crate::{attack, bitboard_consts, geometry, legal, movegen, zobrist};

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Position validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// En passant target square is located on an invalid rank
    #[error("invalid enpassant square {0}")]
    InvalidEnpassant(Square),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Square),
    /// Opponent's king is under attack
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing the first field of FEN (i.e. the placement of pieces)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`RawPosition`] from FEN
///
/// Every variant except [`RawFenParseError::NonAscii`] and [`RawFenParseError::FieldCount`]
/// names the field which failed to parse.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawFenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// FEN doesn't consist of exactly six fields
    #[error("expected 6 fields, found {0}")]
    FieldCount(usize),
    /// Error parsing piece placement
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    /// Error parsing side to move
    #[error("bad move side: {0}")]
    MoveSide(#[from] types::ColorParseError),
    /// Error parsing castling rights
    #[error("bad castling rights: {0}")]
    Castling(#[from] types::CastlingRightsParseError),
    /// Error parsing en passant square
    #[error("bad enpassant: {0}")]
    Enpassant(#[from] types::SquareParseError),
    /// En passant square is on a rank where no double push could have ended
    #[error("invalid enpassant rank {0}")]
    InvalidEnpassantRank(Rank),
    /// Error parsing halfmove clock
    #[error("bad halfmove clock: {0}")]
    HalfmoveClock(ParseIntError),
    /// Error parsing fullmove number
    #[error("bad fullmove number: {0}")]
    FullmoveNumber(ParseIntError),
}

/// Error parsing [`Position`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// Position cannot be parsed
    #[error("cannot parse fen: {0}")]
    Fen(#[from] RawFenParseError),
    /// Position was parsed, but it's invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Unvalidated chess position
///
/// Contains everything needed to describe the position, but may hold an illegal one. Build or edit
/// it directly, then convert it into [`Position`] via [`Position::try_from()`].
///
/// # Example
///
/// ```
/// # use raychess::{RawPosition, Position, File, Rank, Color, Piece, Cell, CastlingRights};
/// #
/// let mut raw = RawPosition::empty();
/// raw.put2(File::B, Rank::R2, Cell::from_parts(Color::White, Piece::King));
/// raw.put2(File::D, Rank::R5, Cell::from_parts(Color::Black, Piece::King));
/// raw.halfmove = 10;
/// raw.fullmove = 42;
///
/// let pos: Position = raw.try_into().unwrap();
/// assert_eq!(pos.as_fen(), "8/8/8/3k4/8/8/1K6/8 w - - 10 42");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawPosition {
    /// Contents of the board, indexed by [`Square::index()`]
    pub cells: [Cell; 64],
    /// Side to move
    pub side: Color,
    /// Castling rights
    pub castling: CastlingRights,
    /// En passant target square, i.e. the square a capturing pawn would land on
    pub ep: Option<Square>,
    /// Number of half-moves since the last pawn move or capture
    pub halfmove: u16,
    /// Move number, incremented after each move by Black
    pub fullmove: u16,
}

impl RawPosition {
    /// Returns a position without any pieces
    #[inline]
    pub const fn empty() -> RawPosition {
        RawPosition {
            cells: [Cell::EMPTY; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    /// Returns the initial position
    pub fn initial() -> RawPosition {
        let mut res = RawPosition {
            castling: CastlingRights::FULL,
            ..RawPosition::empty()
        };
        for file in File::iter() {
            res.put2(file, Rank::R2, Cell::from_parts(Color::White, Piece::Pawn));
            res.put2(file, Rank::R7, Cell::from_parts(Color::Black, Piece::Pawn));
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            let back = [
                Piece::Rook,
                Piece::Knight,
                Piece::Bishop,
                Piece::Queen,
                Piece::King,
                Piece::Bishop,
                Piece::Knight,
                Piece::Rook,
            ];
            for (file, piece) in File::iter().zip(back) {
                res.put2(file, rank, Cell::from_parts(color, piece));
            }
        }
        res
    }

    /// Parses a position from FEN
    #[inline]
    pub fn from_fen(fen: &str) -> Result<RawPosition, RawFenParseError> {
        RawPosition::from_str(fen)
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Cell {
        unsafe { *self.cells.get_unchecked(sq.index()) }
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Square::from_parts(file, rank))
    }

    #[inline]
    pub fn put(&mut self, sq: Square, cell: Cell) {
        unsafe {
            *self.cells.get_unchecked_mut(sq.index()) = cell;
        }
    }

    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Square::from_parts(file, rank), cell);
    }

    /// Computes Zobrist hash of the position from scratch
    ///
    /// The hash doesn't include the halfmove clock and the fullmove number.
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = if self.side == Color::White {
            zobrist::MOVE_SIDE
        } else {
            0
        };
        if let Some(p) = self.ep {
            hash ^= zobrist::enpassant(p);
        }
        hash ^= zobrist::castling(self.castling);
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.is_occupied() {
                hash ^= zobrist::pieces(*cell, Square::from_index(i));
            }
        }
        hash
    }

    /// Square of the pawn which may be captured en passant
    #[inline]
    pub fn ep_victim(&self) -> Option<Square> {
        let p = self.ep?;
        Some(Square::from_parts(
            p.file(),
            geometry::enpassant_src_rank(self.side),
        ))
    }

    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl Default for RawPosition {
    #[inline]
    fn default() -> RawPosition {
        RawPosition::empty()
    }
}

/// Pieces of a single color, one bitboard per piece kind
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PieceSet {
    pub color: Color,
    pub pieces: [Bitboard; Piece::COUNT],
}

impl PieceSet {
    #[inline]
    pub fn get(&self, p: Piece) -> Bitboard {
        self.pieces[p.index()]
    }

    /// Bishops and queens
    #[inline]
    pub fn diagonal(&self) -> Bitboard {
        self.get(Piece::Bishop) | self.get(Piece::Queen)
    }

    /// Rooks and queens
    #[inline]
    pub fn orthogonal(&self) -> Bitboard {
        self.get(Piece::Rook) | self.get(Piece::Queen)
    }

    /// Sliders able to move along a ray of the given kind
    #[inline]
    pub fn sliders(&self, diagonal: bool) -> Bitboard {
        if diagonal {
            self.diagonal()
        } else {
            self.orthogonal()
        }
    }

    pub fn occupancy(&self) -> Bitboard {
        self.pieces
            .iter()
            .fold(Bitboard::EMPTY, |acc, &bb| acc | bb)
    }

    /// Removes whatever stands on `sq`, as if it was captured
    #[inline]
    pub fn remove(&mut self, sq: Square) {
        for bb in &mut self.pieces {
            bb.unset(sq);
        }
    }
}

/// Validated chess position
///
/// Always holds a legal position. Alongside the [`RawPosition`] it keeps per-piece and
/// per-color bitboards, both king squares and the Zobrist hash, all of which are updated
/// incrementally when moves are made.
///
/// Comparison with `==` checks every field, including the derived ones.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) r: RawPosition,
    pub(crate) hash: u64,
    pub(crate) colors: [Bitboard; 2],
    pub(crate) all: Bitboard,
    pub(crate) pieces: [Bitboard; Cell::COUNT],
    pub(crate) kings: [Square; 2],
}

impl Position {
    /// Returns the initial position
    pub fn initial() -> Position {
        match RawPosition::initial().try_into() {
            Ok(pos) => pos,
            Err(e) => panic!("initial position must be valid: {}", e),
        }
    }

    /// Parses a position from FEN
    pub fn from_fen(fen: &str) -> Result<Position, FenParseError> {
        Position::from_str(fen)
    }

    #[inline]
    pub fn raw(&self) -> &RawPosition {
        &self.r
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Cell {
        self.r.get(sq)
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.r.get2(file, rank)
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.r.side
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.r.castling
    }

    /// En passant target square
    #[inline]
    pub fn ep(&self) -> Option<Square> {
        self.r.ep
    }

    #[inline]
    pub fn halfmove(&self) -> u16 {
        self.r.halfmove
    }

    #[inline]
    pub fn fullmove(&self) -> u16 {
        self.r.fullmove
    }

    /// Returns all the pieces of color `c`
    #[inline]
    pub fn color(&self, c: Color) -> Bitboard {
        unsafe { *self.colors.get_unchecked(c.index()) }
    }

    /// Returns all the occupied squares
    #[inline]
    pub fn all(&self) -> Bitboard {
        self.all
    }

    /// Returns all the empty squares
    #[inline]
    pub fn empty(&self) -> Bitboard {
        !self.all
    }

    /// Returns the squares holding `c`
    ///
    /// For an empty cell, returns an empty bitboard.
    #[inline]
    pub fn piece(&self, c: Cell) -> Bitboard {
        unsafe { *self.pieces.get_unchecked(c.index()) }
    }

    #[inline]
    pub fn piece2(&self, c: Color, p: Piece) -> Bitboard {
        self.piece(Cell::from_parts(c, p))
    }

    /// Returns the pieces of color `c` grouped by kind
    pub fn piece_set(&self, c: Color) -> PieceSet {
        PieceSet {
            color: c,
            pieces: Piece::ALL.map(|p| self.piece2(c, p)),
        }
    }

    /// Returns the square of the king of color `c`
    #[inline]
    pub fn king(&self, c: Color) -> Square {
        unsafe { *self.kings.get_unchecked(c.index()) }
    }

    /// Returns the Zobrist hash of the position
    ///
    /// Unlike [`RawPosition::zobrist_hash()`], this just returns the incrementally updated value.
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// Returns all the pieces of color `by` attacking `sq`
    pub fn attackers(&self, sq: Square, by: Color) -> Bitboard {
        let enemy = self.piece_set(by);
        (attack::pawn(by.inv(), sq) & enemy.get(Piece::Pawn))
            | (attack::knight(sq) & enemy.get(Piece::Knight))
            | (attack::king(sq) & enemy.get(Piece::King))
            | (attack::bishop(sq, self.all) & enemy.diagonal())
            | (attack::rook(sq, self.all) & enemy.orthogonal())
    }

    /// Returns `true` if any piece of color `by` attacks `sq`
    #[inline]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers(sq, by).is_nonempty()
    }

    /// Returns all the pieces giving check to the side to move
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        let c = self.r.side;
        self.attackers(self.king(c), c.inv())
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        let c = self.r.side;
        legal::is_king_in_check(
            self.king(c),
            c,
            self.color(c),
            &self.piece_set(c.inv()),
            None,
        )
    }

    /// Returns `true` if the side which just moved left its king under attack
    #[inline]
    pub fn is_opponent_king_attacked(&self) -> bool {
        let c = self.r.side;
        legal::is_king_in_check(
            self.king(c.inv()),
            c.inv(),
            self.color(c.inv()),
            &self.piece_set(c),
            None,
        )
    }

    /// Generates all the legal moves
    #[inline]
    pub fn legal_moves(&self) -> movegen::MoveList {
        movegen::legal_moves(self)
    }

    #[inline]
    pub fn has_legal_moves(&self) -> bool {
        movegen::has_legal_moves(self)
    }

    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.has_legal_moves()
    }

    #[inline]
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && !self.has_legal_moves()
    }

    /// Applies `mv` to a copy of the position and returns the copy
    ///
    /// The move must be legal in this position.
    #[inline]
    pub fn make_move(&self, mv: Move) -> Position {
        let mut res = *self;
        res.make_move_raw(mv);
        res
    }

    /// Parses `s` as a UCI move legal in this position and applies it to a copy
    pub fn make_uci(&self, s: &str) -> Result<Position, moves::uci::ParseError> {
        Ok(self.make_move(Move::from_uci(s, self)?))
    }

    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    pub(crate) fn put_piece(&mut self, sq: Square, cell: Cell) {
        let (Some(color), Some(piece)) = (cell.color(), cell.piece()) else {
            return;
        };
        self.r.put(sq, cell);
        self.pieces[cell.index()].set(sq);
        self.colors[color.index()].set(sq);
        self.all.set(sq);
        self.hash ^= zobrist::pieces(cell, sq);
        if piece == Piece::King {
            self.kings[color.index()] = sq;
        }
    }

    pub(crate) fn remove_piece(&mut self, sq: Square) -> Cell {
        let cell = self.r.get(sq);
        let Some(color) = cell.color() else {
            return cell;
        };
        self.r.put(sq, Cell::EMPTY);
        self.pieces[cell.index()].unset(sq);
        self.colors[color.index()].unset(sq);
        self.all.unset(sq);
        self.hash ^= zobrist::pieces(cell, sq);
        cell
    }
}

impl TryFrom<RawPosition> for Position {
    type Error = ValidateError;

    fn try_from(mut raw: RawPosition) -> Result<Position, ValidateError> {
        // Check en passant
        if let Some(p) = raw.ep {
            if p.rank() != geometry::enpassant_dst_rank(raw.side) {
                return Err(ValidateError::InvalidEnpassant(p));
            }

            // Reset en passant if there is no pawn which has just made a double push
            let victim = p.add(geometry::pawn_forward_delta(raw.side.inv()));
            let origin = p.add(geometry::pawn_forward_delta(raw.side));
            if raw.get(victim) != Cell::from_parts(raw.side.inv(), Piece::Pawn)
                || raw.get(p).is_occupied()
                || raw.get(origin).is_occupied()
            {
                raw.ep = None;
            }
        }

        // Reset castling flags whose pieces are not at home
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            if raw.get2(File::E, rank) != Cell::from_parts(color, Piece::King) {
                raw.castling.unset_color(color);
            }
            if raw.get2(File::A, rank) != Cell::from_parts(color, Piece::Rook) {
                raw.castling.unset(color, CastlingSide::Queen);
            }
            if raw.get2(File::H, rank) != Cell::from_parts(color, Piece::Rook) {
                raw.castling.unset(color, CastlingSide::King);
            }
        }

        let mut colors = [Bitboard::EMPTY; 2];
        let mut pieces = [Bitboard::EMPTY; Cell::COUNT];
        for (idx, cell) in raw.cells.iter().enumerate() {
            let sq = Square::from_index(idx);
            if let Some(color) = cell.color() {
                colors[color.index()].set(sq);
                pieces[cell.index()].set(sq);
            }
        }

        let mut kings = [Square::from_index(0); 2];
        for color in [Color::White, Color::Black] {
            let king = pieces[Cell::from_parts(color, Piece::King).index()];
            if king.popcount() > 1 {
                return Err(ValidateError::TooManyKings(color));
            }
            kings[color.index()] = king.lowest().ok_or(ValidateError::NoKing(color))?;
        }

        let pawns = pieces[Cell::from_parts(Color::White, Piece::Pawn).index()]
            | pieces[Cell::from_parts(Color::Black, Piece::Pawn).index()];
        if let Some(bad) = (pawns & bitboard_consts::PAWN_FORBIDDEN).lowest() {
            return Err(ValidateError::InvalidPawn(bad));
        }

        let res = Position {
            r: raw,
            hash: raw.zobrist_hash(),
            colors,
            all: colors[0] | colors[1],
            pieces,
            kings,
        };
        if res.is_opponent_king_attacked() {
            return Err(ValidateError::OpponentKingAttacked);
        }

        Ok(res)
    }
}

impl TryFrom<&RawPosition> for Position {
    type Error = ValidateError;

    fn try_from(raw: &RawPosition) -> Result<Position, ValidateError> {
        (*raw).try_into()
    }
}

fn parse_cells(s: &str) -> Result<[Cell; 64], CellsParseError> {
    type Error = CellsParseError;

    // FEN lists the ranks from 8 down to 1
    let mut file = 0_usize;
    let mut row = 0_usize;
    let mut cells = [Cell::EMPTY; 64];
    let rank = |row: usize| Rank::from_index(7 - row);
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(rank(row)));
                }
                file += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(rank(row)));
                }
                row += 1;
                file = 0;
                if row >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                let cell = match Cell::from_char(b as char) {
                    Some(c) if c.is_occupied() => c,
                    _ => return Err(Error::UnexpectedChar(b as char)),
                };
                if file >= 8 {
                    return Err(Error::RankOverflow(rank(row)));
                }
                cells[Square::from_parts(File::from_index(file), rank(row)).index()] = cell;
                file += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(rank(row)));
    }
    if row < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

fn parse_ep(s: &str, side: Color) -> Result<Option<Square>, RawFenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let ep = Square::from_str(s)?;
    if ep.rank() != geometry::enpassant_dst_rank(side) {
        return Err(RawFenParseError::InvalidEnpassantRank(ep.rank()));
    }
    Ok(Some(ep))
}

impl FromStr for RawPosition {
    type Err = RawFenParseError;

    fn from_str(s: &str) -> Result<RawPosition, Self::Err> {
        type Error = RawFenParseError;

        if !s.is_ascii() {
            return Err(Error::NonAscii);
        }
        let fields: Vec<&str> = s.split_ascii_whitespace().collect();
        let [cells, side, castling, ep, halfmove, fullmove] = fields.as_slice() else {
            return Err(Error::FieldCount(fields.len()));
        };

        let cells = parse_cells(cells)?;
        let side = Color::from_str(side)?;
        let castling = CastlingRights::from_str(castling)?;
        let ep = parse_ep(ep, side)?;
        let halfmove = u16::from_str(halfmove).map_err(Error::HalfmoveClock)?;
        let fullmove = u16::from_str(fullmove).map_err(Error::FullmoveNumber)?;

        Ok(RawPosition {
            cells,
            side,
            castling,
            ep,
            halfmove,
            fullmove,
        })
    }
}

impl FromStr for Position {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Position, Self::Err> {
        Ok(RawPosition::from_str(s)?.try_into()?)
    }
}

fn format_cells(cells: &[Cell; 64], f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    for rank in Rank::iter().rev() {
        if rank != Rank::R8 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for file in File::iter() {
            let cell = cells[Square::from_parts(file, rank).index()];
            if cell.is_empty() {
                empty += 1;
                continue;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
                empty = 0;
            }
            write!(f, "{}", cell)?;
        }
        if empty != 0 {
            write!(f, "{}", empty)?;
        }
    }
    Ok(())
}

impl Display for RawPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        format_cells(&self.cells, f)?;
        write!(f, " {} {}", self.side, self.castling)?;
        match self.ep {
            Some(p) => write!(f, " {}", p)?,
            None => write!(f, " -")?,
        };
        write!(f, " {} {}", self.halfmove, self.fullmove)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.r.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    const INI_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_initial() {
        assert_eq!(RawPosition::initial().to_string(), INI_FEN);
        assert_eq!(Position::initial().to_string(), INI_FEN);
        assert_eq!(RawPosition::from_str(INI_FEN), Ok(RawPosition::initial()));
        assert_eq!(Position::from_str(INI_FEN), Ok(Position::initial()));

        let pos = Position::initial();
        assert_eq!(pos.all().popcount(), 32);
        assert_eq!(pos.empty().popcount(), 32);
        assert_eq!(pos.king(Color::White).to_string(), "e1");
        assert_eq!(pos.king(Color::Black).to_string(), "e8");
        assert_eq!(pos.piece2(Color::White, Piece::Pawn), bitboard_consts::rank(Rank::R2));
        assert!(!pos.is_check());
        assert!(pos.checkers().is_empty());
    }

    #[test]
    fn test_midgame() {
        const FEN: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21";

        let pos = Position::from_fen(FEN).unwrap();
        assert_eq!(pos.as_fen(), FEN);
        assert_eq!(
            pos.get2(File::B, Rank::R4),
            Cell::from_parts(Color::Black, Piece::Bishop)
        );
        assert_eq!(
            pos.get2(File::F, Rank::R2),
            Cell::from_parts(Color::White, Piece::Queen)
        );
        assert_eq!(pos.king(Color::White), Square::from_parts(File::H, Rank::R1));
        assert_eq!(pos.king(Color::Black), Square::from_parts(File::G, Rank::R8));
        assert_eq!(pos.side(), Color::White);
        assert_eq!(pos.castling(), CastlingRights::EMPTY);
        assert_eq!(pos.ep(), None);
        assert_eq!(pos.halfmove(), 1);
        assert_eq!(pos.fullmove(), 21);
    }

    #[test]
    fn test_fixes() {
        const FEN: &str = "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w KQkq c6 6 5";

        let raw = RawPosition::from_fen(FEN).unwrap();
        assert_eq!(raw.castling, CastlingRights::FULL);
        assert_eq!(raw.ep, Some(Square::from_parts(File::C, Rank::R6)));
        assert_eq!(raw.ep_victim(), Some(Square::from_parts(File::C, Rank::R5)));
        assert_eq!(raw.as_fen(), FEN);

        let pos: Position = raw.try_into().unwrap();
        assert_eq!(
            pos.castling(),
            CastlingRights::EMPTY.with(Color::White, CastlingSide::Queen)
        );
        assert_eq!(pos.ep(), None);
        assert_eq!(
            pos.as_fen(),
            "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w Q - 6 5"
        );
    }

    #[test]
    fn test_field_count() {
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(RawFenParseError::FieldCount(1))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(RawFenParseError::FieldCount(4))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 x"),
            Err(RawFenParseError::FieldCount(7))
        );
        assert_eq!(RawPosition::from_fen(""), Err(RawFenParseError::FieldCount(0)));
    }

    #[test]
    fn test_bad_fields() {
        type E = RawFenParseError;
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1"),
            Err(E::Board(CellsParseError::UnexpectedChar('X')))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1"),
            Err(E::Board(CellsParseError::Underflow))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8 w KQkq - 0 1"),
            Err(E::Board(CellsParseError::Overflow))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(E::Board(CellsParseError::RankUnderflow(Rank::R7)))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(E::Board(CellsParseError::UnexpectedChar('9')))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/7p1/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(E::Board(CellsParseError::RankOverflow(Rank::R6)))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(E::MoveSide(types::ColorParseError::UnexpectedChar('x')))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkz - 0 1"),
            Err(E::Castling(types::CastlingRightsParseError::UnexpectedChar('z')))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1"),
            Err(E::Enpassant(types::SquareParseError::UnexpectedRankChar('9')))
        );
        assert_eq!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1"),
            Err(E::InvalidEnpassantRank(Rank::R3))
        );
        assert!(matches!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1"),
            Err(E::HalfmoveClock(_))
        ));
        assert!(matches!(
            RawPosition::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 -1"),
            Err(E::FullmoveNumber(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::NoKing(Color::Black)))
        );
        assert_eq!(
            Position::from_fen("k7/8/8/8/8/8/8/K6K w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::TooManyKings(Color::White)))
        );
        assert_eq!(
            Position::from_fen("k6P/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::InvalidPawn(
                Square::from_parts(File::H, Rank::R8)
            )))
        );
        assert_eq!(
            Position::from_fen("k6R/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenParseError::Valid(ValidateError::OpponentKingAttacked))
        );
        assert_eq!(
            Position::try_from(RawPosition {
                ep: Some(Square::from_parts(File::E, Rank::R3)),
                ..RawPosition::initial()
            }),
            Err(ValidateError::InvalidEnpassant(Square::from_parts(File::E, Rank::R3)))
        );
    }

    #[test]
    fn test_attacks() {
        let pos =
            Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4")
                .unwrap();
        let f7 = Square::from_parts(File::F, Rank::R7);
        assert_eq!(
            pos.attackers(f7, Color::White),
            Bitboard::EMPTY
                .with(Square::from_parts(File::C, Rank::R4))
                .with(Square::from_parts(File::H, Rank::R5))
        );
        assert!(pos.is_square_attacked(f7, Color::Black));
        assert!(!pos.is_square_attacked(Square::from_parts(File::A, Rank::R5), Color::White));

        let mated = pos.make_uci("h5f7").unwrap();
        assert!(mated.is_check());
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());
        assert_eq!(mated.checkers().popcount(), 1);

        let stalemate = Position::from_fen("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1").unwrap();
        assert!(stalemate.is_stalemate());
        assert!(!stalemate.is_checkmate());
    }

    #[test]
    fn test_fen_roundtrip_playout() {
        let mut rng = StdRng::seed_from_u64(0x5eed_f00d);
        for _ in 0..20 {
            let mut pos = Position::initial();
            for _ in 0..80 {
                let moves = pos.legal_moves();
                let Some(&mv) = moves.choose(&mut rng) else {
                    break;
                };
                pos = pos.make_move(mv);
                let fen = pos.as_fen();
                let parsed = Position::from_fen(&fen).unwrap();
                assert_eq!(parsed.raw().cells, pos.raw().cells, "{}", fen);
                assert_eq!(parsed.side(), pos.side());
                assert_eq!(parsed.castling(), pos.castling());
                assert_eq!(parsed.ep(), pos.ep());
                assert_eq!(parsed, pos);
                assert_eq!(pos.zobrist_hash(), pos.raw().zobrist_hash());
            }
        }
    }
}
