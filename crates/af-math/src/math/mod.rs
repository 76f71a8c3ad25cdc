//! Core math modules.

pub mod normal;
pub mod omori;
pub mod poisson;
pub mod stable;
