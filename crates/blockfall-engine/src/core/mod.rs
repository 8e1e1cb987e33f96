//! Static game data: shapes, the piece catalog and the playfield grid.

pub use self::{catalog::*, playfield::*, shape::*};

pub(crate) mod catalog;
pub(crate) mod playfield;
pub(crate) mod shape;
