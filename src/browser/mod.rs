pub mod extractor;
pub mod session;

pub use extractor::*;
pub use session::*;
