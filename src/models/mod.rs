pub mod generated;
pub mod prompt;
pub mod wire;

pub use generated::*;
pub use prompt::*;
pub use wire::*;
