pub mod error;
pub mod feature;
pub mod graticule;
pub mod source;
pub mod store;

pub use error::*;
pub use feature::*;
pub use source::*;
pub use store::*;
