pub mod assembler;
pub mod features;
pub mod location;
pub mod numeric;
pub mod traits;

pub use traits::{classify, FromRawText};
