//! Trading calendar and intraday session arithmetic.
//!
//! Hexagonal architecture: the engine in [`domain`], collaborator traits in
//! [`ports`], concrete implementations in [`adapters`], and the command-line
//! front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
