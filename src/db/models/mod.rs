mod deliverable;
mod project;
mod quote;
mod user;

pub use deliverable::*;
pub use project::*;
pub use quote::*;
pub use user::*;
