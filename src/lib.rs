#![doc = "geodrill public API"]
mod config;
mod controller;
mod error;
mod geom;
mod names;
mod render;
mod router;
mod selection;
mod session;
mod source;
mod style;
mod types;

pub mod farm;

#[doc(inline)]
pub use types::{BoundaryLevel, ParentKeys, Region, SelectionPath};

#[doc(inline)]
pub use geom::{Feature, FeatureCollection, Properties};

#[doc(inline)]
pub use names::NameResolver;

#[doc(inline)]
pub use selection::{ChangeKind, OptionLists, SelectionChange, SelectionModel};

#[doc(inline)]
pub use controller::{BoundaryLayerController, BoundarySet, Completion, FetchRequest, ViewState};

#[doc(inline)]
pub use router::{ClickRoute, RegionClickRouter};

#[doc(inline)]
pub use style::{AttributeSelection, AttributeSpec, AttributeStyler, Category, LegendEntry, Rgb, ShapeStyle, ATTRIBUTES, NO_DATA};

#[doc(inline)]
pub use render::{LayerHandle, MapRenderer, SvgRenderer};

#[doc(inline)]
pub use source::{query_pairs, DirGeometrySource, GeometrySource, MemoryGeometrySource};

#[cfg(feature = "http")]
#[doc(inline)]
pub use source::HttpGeometrySource;

#[doc(inline)]
pub use session::{MapSession, UserAction};

#[doc(inline)]
pub use error::{SelectionError, SyncError};

#[doc(inline)]
pub use config::{Config, ServiceConfig, ViewConfig};
