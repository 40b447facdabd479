//! # raychess
//!
//! Chess rules engine built around bitboards and precomputed ray tables.
//!
//! It generates strictly legal moves, tags the moves which give check, applies and takes back
//! moves in place, and provides a fixed-depth alpha-beta search and a multithreaded perft.
//!
//! # Example
//!
//! ```
//! use raychess::{Game, Position, AlphaBeta, SearchConfig, Material};
//! use raychess::perft;
//!
//! let mut pos = Position::initial();
//! assert_eq!(perft::perft(&mut pos, 3), 8902);
//!
//! let mut game = Game::initial();
//! game.push_uci_list("e2e4 e7e5 g1f3").unwrap();
//! assert_eq!(
//!     game.position().as_fen(),
//!     "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2",
//! );
//!
//! let mut search = AlphaBeta::new(Material, SearchConfig { depth: 2 });
//! let res = search.search(game.position());
//! assert!(res.best.is_some());
//! ```

pub use raychess_base::{bitboard, bitboard_consts, geometry, ray, types};

pub mod attack;
pub mod castling;
pub mod check;
pub mod eval;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod perft;
pub mod position;
pub mod search;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use eval::{Evaluator, Material, Score};
pub use game::Game;
pub use movegen::MoveList;
pub use moves::{Make, Move, PromotePiece, Undo};
pub use perft::{PerftConfig, PerftError, PerftReport};
pub use position::{PieceSet, Position, RawPosition};
pub use ray::Ray;
pub use search::{AlphaBeta, SearchConfig, SearchResult};
pub use types::{CastlingRights, CastlingSide, Cell, Color, File, Piece, Rank, Square};
