mod fetch;
mod layer;
mod view;

pub use fetch::FetchRequest;
pub use layer::{BoundaryLayerController, BoundarySet, Completion};
pub use view::ViewState;
