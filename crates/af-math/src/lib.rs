//! Aftershock forecast math utilities.

pub mod math;

pub use math::normal::*;
pub use math::omori::*;
pub use math::poisson::*;
pub use math::stable::*;
