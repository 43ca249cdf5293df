//! Piecewise-constant interval maps kept in canonical form

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod lowest;
pub mod map;
pub mod oracle;

pub use lowest::Lowest;
pub use map::{CanonicalIntervalMap, Interval};
