mod dir;
#[cfg(feature = "http")]
mod http;
mod memory;

use std::sync::Arc;

use anyhow::Result;

use crate::{geom::FeatureCollection, types::BoundaryLevel};

pub use dir::DirGeometrySource;
#[cfg(feature = "http")]
pub use http::HttpGeometrySource;
#[cfg(feature = "http")]
pub(crate) use http::build_client;
pub use memory::MemoryGeometrySource;

/// Anything that can serve the boundaries of `level` under `parents`
/// (top-down ancestor names; empty for the State level).
pub trait GeometrySource {
    fn fetch(&self, level: BoundaryLevel, parents: &[Arc<str>]) -> Result<FeatureCollection>;
}

impl<S: GeometrySource + ?Sized> GeometrySource for &S {
    fn fetch(&self, level: BoundaryLevel, parents: &[Arc<str>]) -> Result<FeatureCollection> {
        (**self).fetch(level, parents)
    }
}

/// Service query pairs for a parent path: `state=..`, then `district=..`.
pub fn query_pairs(parents: &[Arc<str>]) -> Vec<(&'static str, &str)> {
    BoundaryLevel::ALL.iter()
        .zip(parents)
        .map(|(level, name)| (level.query_key(), &**name))
        .collect()
}
