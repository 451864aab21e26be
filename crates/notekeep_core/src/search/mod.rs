//! Note search helpers.
//!
//! Filtering lives outside the store: the store only hands out the full
//! sequence and consumers narrow it down.

pub mod title;
