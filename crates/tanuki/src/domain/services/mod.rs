//! Domain Services
//!
//! Stateless helpers shared by every formatter.

mod attachments;
mod names;
mod refs;
mod text;

pub use attachments::*;
pub use names::*;
pub use refs::*;
pub use text::*;
