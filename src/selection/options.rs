use crate::types::BoundaryLevel;

/// Dropdown option lists, derived from the most recently accepted boundary
/// set of each level. They are cleared, never patched, when their parent changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionLists {
    states: Vec<String>,
    districts: Vec<String>,
    subdistricts: Vec<String>,
}

impl OptionLists {
    #[inline] pub fn states(&self) -> &[String] { &self.states }
    #[inline] pub fn districts(&self) -> &[String] { &self.districts }
    #[inline] pub fn subdistricts(&self) -> &[String] { &self.subdistricts }

    pub fn get(&self, level: BoundaryLevel) -> &[String] {
        match level {
            BoundaryLevel::State => &self.states,
            BoundaryLevel::District => &self.districts,
            BoundaryLevel::Subdistrict => &self.subdistricts,
        }
    }

    pub fn contains(&self, level: BoundaryLevel, name: &str) -> bool {
        self.get(level).iter().any(|option| option == name)
    }

    /// The option spelled like `name`: an exact match, else the single
    /// case-insensitive match. Several case-insensitive matches resolve to nothing.
    pub fn canonical(&self, level: BoundaryLevel, name: &str) -> Option<&str> {
        canonical_in(self.get(level), name)
    }

    pub(crate) fn set(&mut self, level: BoundaryLevel, names: Vec<String>) {
        *self.slot(level) = names;
    }

    /// Clear the options of `level` and of every level below it.
    pub(crate) fn clear_from(&mut self, level: BoundaryLevel) {
        for lvl in BoundaryLevel::ALL.into_iter().filter(|&l| l >= level) {
            self.slot(lvl).clear();
        }
    }

    fn slot(&mut self, level: BoundaryLevel) -> &mut Vec<String> {
        match level {
            BoundaryLevel::State => &mut self.states,
            BoundaryLevel::District => &mut self.districts,
            BoundaryLevel::Subdistrict => &mut self.subdistricts,
        }
    }
}

/// Exact match, else a unique case-insensitive match.
pub(crate) fn canonical_in<'a, S: AsRef<str>>(options: &'a [S], name: &str) -> Option<&'a str> {
    let name = name.trim();
    if let Some(exact) = options.iter().map(AsRef::as_ref).find(|o| *o == name) {
        return Some(exact);
    }
    let mut folded = options.iter().map(AsRef::as_ref).filter(|o| o.eq_ignore_ascii_case(name));
    match (folded.next(), folded.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
