pub mod building;
pub mod filter;
pub mod format;

pub use building::*;
pub use filter::*;
pub use format::*;
