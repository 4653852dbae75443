//! Configuration spaces with swept parameters and their Cartesian expansion.

mod expand;
mod hash;
mod space;

pub use expand::{expand, ConcreteConfig};
pub use hash::stable_hash_string;
pub use space::{ConfigSpace, ConfigValue, SweepSpec};
