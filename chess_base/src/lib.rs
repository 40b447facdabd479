//! # Base types for raychess
//!
//! Core geometry shared between `raychess` and its build script, which generates the attack
//! and hashing tables from the definitions found here.
//!
//! Normally you want to use `raychess` instead, which re-exports everything you need.

pub mod bitboard;
pub mod bitboard_consts;
pub mod geometry;
pub mod ray;
pub mod types;
