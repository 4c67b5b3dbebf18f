//! Coherent noise and domain warping.
//!
//! [`NoiseField`] is a seeded 2D simplex field in `[-1, 1]`. [`DomainWarp`] samples it at
//! coordinates displaced by two decorrelated reads of the same field, which is what gives
//! the posters their folded, marbled look.
pub mod simplex;
pub mod warp;

pub use simplex::NoiseField;
pub use warp::{DomainWarp, DEFAULT_WARP_OFFSET};
