use crate::types::{BoundaryLevel, SelectionPath};

/// Controller state, derived from the selection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    Country,           // All states
    StateChosen,       // Districts of the chosen state
    DistrictChosen,    // Sub-districts of the chosen district
    SubdistrictChosen, // One sub-district, filtered locally
}

impl ViewState {
    pub fn from_path(path: &SelectionPath) -> Self {
        match path.deepest() {
            None => ViewState::Country,
            Some(BoundaryLevel::State) => ViewState::StateChosen,
            Some(BoundaryLevel::District) => ViewState::DistrictChosen,
            Some(BoundaryLevel::Subdistrict) => ViewState::SubdistrictChosen,
        }
    }

    /// Level of the boundary set rendered in this state.
    pub fn boundary_level(&self) -> BoundaryLevel {
        match self {
            ViewState::Country => BoundaryLevel::State,
            ViewState::StateChosen => BoundaryLevel::District,
            ViewState::DistrictChosen | ViewState::SubdistrictChosen => BoundaryLevel::Subdistrict,
        }
    }

    /// Level a click selects in this state; `None` at the leaf.
    pub fn click_level(&self) -> Option<BoundaryLevel> {
        match self {
            ViewState::SubdistrictChosen => None,
            other => Some(other.boundary_level()),
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            ViewState::Country => "country",
            ViewState::StateChosen => "state_chosen",
            ViewState::DistrictChosen => "district_chosen",
            ViewState::SubdistrictChosen => "subdistrict_chosen",
        }
    }
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}
