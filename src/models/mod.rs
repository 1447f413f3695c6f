pub mod company;
pub mod export;
pub mod record;

pub use company::*;
pub use export::*;
pub use record::*;
