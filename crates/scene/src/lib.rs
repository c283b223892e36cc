pub mod markers;
pub mod picking;
pub mod projection;
pub mod selection;
pub mod visibility;

pub use markers::*;
pub use picking::*;
pub use projection::*;
pub use selection::*;
pub use visibility::*;
