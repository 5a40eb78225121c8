use std::sync::Arc;

use super::{level::BoundaryLevel, path::{ParentKeys, SelectionPath}};

/// A named region at some level. Names are the natural key; datasets do not
/// share numeric ids across levels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub level: BoundaryLevel,
    pub name: Arc<str>,
    pub parent_path: ParentKeys, // Ancestor names, top-down
}

impl Region {
    pub fn new(level: BoundaryLevel, name: impl Into<Arc<str>>, parent_path: ParentKeys) -> Self {
        Self { level, name: name.into(), parent_path }
    }

    /// The region selected at `level` in `path`, if that level and its ancestors are set.
    pub fn from_path(path: &SelectionPath, level: BoundaryLevel) -> Option<Self> {
        let name = path.get(level)?;
        Some(Self::new(level, name, path.parents_of(level)?))
    }

    /// Returns the ancestor `Region` at `parent_level`, if it is above this region.
    pub fn to_parent(&self, parent_level: BoundaryLevel) -> Option<Region> {
        if parent_level >= self.level { return None }
        let depth = parent_level.depth();
        let name = self.parent_path.get(depth)?.clone();
        Some(Region {
            level: parent_level,
            name,
            parent_path: self.parent_path[..depth].iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_from_path_and_parent() {
        let mut path = SelectionPath::new();
        path.assign(BoundaryLevel::State, Arc::from("Punjab"));
        path.assign(BoundaryLevel::District, Arc::from("Amritsar"));
        path.assign(BoundaryLevel::Subdistrict, Arc::from("Ajnala"));

        let tehsil = Region::from_path(&path, BoundaryLevel::Subdistrict).unwrap();
        assert_eq!(&*tehsil.name, "Ajnala");

        let state = tehsil.to_parent(BoundaryLevel::State).unwrap();
        assert_eq!(&*state.name, "Punjab");
        assert!(state.parent_path.is_empty());

        let district = tehsil.to_parent(BoundaryLevel::District).unwrap();
        assert_eq!(district.parent_path.as_slice(), &[Arc::<str>::from("Punjab")]);
        assert!(district.to_parent(BoundaryLevel::Subdistrict).is_none());
    }
}
