//! Moves and related things

mod base;
mod make;
pub mod uci;

pub use base::*;
pub use make::{Make, Uci, Undo};
