use std::sync::Arc;

use smallvec::SmallVec;

use super::level::BoundaryLevel;

/// Ancestor names leading to a level, top-down (at most state and district).
pub type ParentKeys = SmallVec<[Arc<str>; 2]>;

/// The current `(state, district, subdistrict)` selection.
///
/// A lower field is only ever set while every field above it is set; the
/// mutators that could break this live on `SelectionModel`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SelectionPath {
    state: Option<Arc<str>>,
    district: Option<Arc<str>>,
    subdistrict: Option<Arc<str>>,
}

impl SelectionPath {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn state(&self) -> Option<&str> { self.state.as_deref() }
    #[inline] pub fn district(&self) -> Option<&str> { self.district.as_deref() }
    #[inline] pub fn subdistrict(&self) -> Option<&str> { self.subdistrict.as_deref() }

    /// Name selected at `level`, if any.
    pub fn get(&self, level: BoundaryLevel) -> Option<&str> {
        match level {
            BoundaryLevel::State => self.state(),
            BoundaryLevel::District => self.district(),
            BoundaryLevel::Subdistrict => self.subdistrict(),
        }
    }

    #[inline] pub fn is_empty(&self) -> bool { self.state.is_none() }

    /// Deepest level with a selection, `None` when nothing is selected.
    pub fn deepest(&self) -> Option<BoundaryLevel> {
        BoundaryLevel::ALL.into_iter().rev().find(|&level| self.get(level).is_some())
    }

    /// True when no lower field is set while a higher one is empty.
    pub fn is_valid(&self) -> bool {
        let set = BoundaryLevel::ALL.map(|level| self.get(level).is_some());
        set.windows(2).all(|pair| pair[0] || !pair[1])
    }

    /// Ancestor names needed to fetch the boundaries of `level`.
    /// Returns `None` if one of them is not selected.
    pub fn parents_of(&self, level: BoundaryLevel) -> Option<ParentKeys> {
        let mut keys = ParentKeys::new();
        let mut current = level.parent();
        while let Some(parent) = current {
            let slot = match parent {
                BoundaryLevel::State => &self.state,
                BoundaryLevel::District => &self.district,
                BoundaryLevel::Subdistrict => &self.subdistrict,
            };
            keys.insert(0, slot.clone()?);
            current = parent.parent();
        }
        Some(keys)
    }

    /// Set `level` and clear every field strictly below it.
    /// Callers are responsible for checking the parent is set.
    pub(crate) fn assign(&mut self, level: BoundaryLevel, name: Arc<str>) {
        match level {
            BoundaryLevel::State => self.state = Some(name),
            BoundaryLevel::District => self.district = Some(name),
            BoundaryLevel::Subdistrict => self.subdistrict = Some(name),
        }
        if let Some(child) = level.child() {
            self.clear_from(child);
        }
    }

    /// Clear `level` and every field below it.
    pub(crate) fn clear_from(&mut self, level: BoundaryLevel) {
        if level <= BoundaryLevel::State { self.state = None }
        if level <= BoundaryLevel::District { self.district = None }
        self.subdistrict = None;
    }
}

impl std::fmt::Display for SelectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?}, {:?})",
            self.state().unwrap_or(""),
            self.district().unwrap_or(""),
            self.subdistrict().unwrap_or(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(state: &str, district: &str) -> SelectionPath {
        let mut p = SelectionPath::new();
        p.assign(BoundaryLevel::State, Arc::from(state));
        p.assign(BoundaryLevel::District, Arc::from(district));
        p
    }

    #[test]
    fn assign_clears_lower_fields() {
        let mut p = path("Punjab", "Amritsar");
        p.assign(BoundaryLevel::Subdistrict, Arc::from("Ajnala"));
        p.assign(BoundaryLevel::State, Arc::from("Haryana"));
        assert_eq!(p.state(), Some("Haryana"));
        assert_eq!(p.district(), None);
        assert_eq!(p.subdistrict(), None);
        assert!(p.is_valid());
    }

    #[test]
    fn parents_of_levels() {
        let p = path("Punjab", "Amritsar");
        assert!(p.parents_of(BoundaryLevel::State).unwrap().is_empty());
        assert_eq!(p.parents_of(BoundaryLevel::District).unwrap().as_slice(), &[Arc::<str>::from("Punjab")]);
        let sub = p.parents_of(BoundaryLevel::Subdistrict).unwrap();
        assert_eq!(sub.iter().map(|s| &**s).collect::<Vec<_>>(), vec!["Punjab", "Amritsar"]);
        assert!(SelectionPath::new().parents_of(BoundaryLevel::District).is_none());
    }

    #[test]
    fn deepest_and_clear() {
        let mut p = path("Punjab", "Amritsar");
        assert_eq!(p.deepest(), Some(BoundaryLevel::District));
        p.clear_from(BoundaryLevel::District);
        assert_eq!(p.deepest(), Some(BoundaryLevel::State));
        p.clear_from(BoundaryLevel::State);
        assert!(p.is_empty());
        assert_eq!(p.deepest(), None);
    }
}
