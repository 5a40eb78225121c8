use serde::{Deserialize, Serialize};

/// A tier in the administrative hierarchy. Each tier has its own boundary dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryLevel {
    State,          // Highest-level entity
    District,       // District -> State
    Subdistrict,    // Lowest-level entity (tehsil / taluk)
}

impl BoundaryLevel {
    pub const ALL: [BoundaryLevel; 3] = [
        BoundaryLevel::State,
        BoundaryLevel::District,
        BoundaryLevel::Subdistrict,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            BoundaryLevel::State => "state",
            BoundaryLevel::District => "district",
            BoundaryLevel::Subdistrict => "subdistrict",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state" => Some(BoundaryLevel::State),
            "district" => Some(BoundaryLevel::District),
            "subdistrict" | "sub_district" | "tehsil" => Some(BoundaryLevel::Subdistrict),
            _ => None,
        }
    }

    /// Position in the hierarchy, 0 for the top level.
    #[inline] pub fn depth(&self) -> usize { *self as usize }

    /// The level directly above this one, if any.
    pub fn parent(&self) -> Option<BoundaryLevel> {
        match self {
            BoundaryLevel::State => None,
            BoundaryLevel::District => Some(BoundaryLevel::State),
            BoundaryLevel::Subdistrict => Some(BoundaryLevel::District),
        }
    }

    /// The level directly below this one, if any.
    pub fn child(&self) -> Option<BoundaryLevel> {
        match self {
            BoundaryLevel::State => Some(BoundaryLevel::District),
            BoundaryLevel::District => Some(BoundaryLevel::Subdistrict),
            BoundaryLevel::Subdistrict => None,
        }
    }

    /// Query-string key used when this level appears as a parent filter.
    #[inline] pub fn query_key(&self) -> &'static str { self.to_str() }
}

impl std::fmt::Display for BoundaryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}
