//! Farm records: the point overlay drawn over the boundary layer, and the
//! analysis submission payload. Neither feeds the boundary controller.

mod analysis;
#[cfg(feature = "http")]
mod client;
mod overlay;
mod records;

pub use analysis::{AnalysisRequest, AnalysisResponse, FieldInput};
#[cfg(feature = "http")]
pub use client::FarmClient;
pub use overlay::{point_overlay, Marker};
pub use records::{FarmQuery, FarmRecord, Locations};
