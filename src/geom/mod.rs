mod features;
mod geojson;

pub use features::{Feature, FeatureCollection, Properties};

pub(crate) use features::union_rect;
