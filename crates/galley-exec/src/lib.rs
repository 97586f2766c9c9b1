pub mod contracts;
pub mod runner;
pub mod script;

pub use contracts::*;
pub use runner::*;
pub use script::*;
