pub mod comparison;
pub mod expense;
pub mod fill_up;
pub mod fuel;
pub mod stats;
pub mod vehicle;

pub use comparison::*;
pub use expense::*;
pub use fill_up::*;
pub use fuel::*;
pub use stats::*;
pub use vehicle::*;
