// HTTP routes
pub mod check;
pub mod diagnostics;
pub mod health;
pub mod results;

pub use check::*;
pub use diagnostics::*;
pub use health::*;
pub use results::*;
