pub mod stage_fetch;
pub mod stage_normalize;
pub mod stage_summarize;

pub use stage_fetch::*;
pub use stage_normalize::*;
pub use stage_summarize::*;
