mod analysis;
mod project;
mod session;

pub use analysis::*;
pub use project::*;
pub use session::*;
