pub mod path;
pub mod symbology;
pub mod vector;

pub use path::{SubPath, sphere_outline, svg_path_data};
pub use symbology::*;
pub use vector::*;
