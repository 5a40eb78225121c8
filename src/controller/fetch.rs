use serde::Serialize;

use crate::{source::query_pairs, types::{BoundaryLevel, ParentKeys, SelectionPath}};

/// A geometry fetch, tagged with the selection context it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FetchRequest {
    pub tag: u64, // Issue order; later requests have larger tags
    pub level: BoundaryLevel,
    #[serde(serialize_with = "serialize_parents")]
    pub parents: ParentKeys,
}

impl FetchRequest {
    /// Query pairs for the boundary service, e.g. `[("state", "Punjab")]`.
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        query_pairs(&self.parents)
    }

    /// True if `path` still leads to the set this request fetches.
    pub fn matches(&self, path: &SelectionPath) -> bool {
        path.parents_of(self.level).as_ref() == Some(&self.parents)
    }

    pub(crate) fn parent_names(&self) -> Vec<String> {
        self.parents.iter().map(|name| name.to_string()).collect()
    }
}

fn serialize_parents<S: serde::Serializer>(parents: &ParentKeys, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(parents.iter().map(|name| &**name))
}
