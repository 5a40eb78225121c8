mod model;
mod options;

pub use model::{ChangeKind, SelectionChange, SelectionModel};
pub use options::OptionLists;

pub(crate) use options::canonical_in;
