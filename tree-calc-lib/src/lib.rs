//! Evaluates arithmetic expressions one line at a time.
//!
//! A line is split into tokens, assembled into an expression tree in a single
//! pass, and the tree is then folded into a number.

pub mod interpreter;
