mod level;
mod path;
mod region;

pub use level::BoundaryLevel;
pub use path::{ParentKeys, SelectionPath};
pub use region::Region;
