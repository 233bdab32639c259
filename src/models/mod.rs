pub mod project;
pub mod todo;

pub use project::*;
pub use todo::*;
