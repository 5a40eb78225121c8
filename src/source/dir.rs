use std::{cell::RefCell, path::{Path, PathBuf}, sync::Arc};

use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::{geom::FeatureCollection, names::NameResolver, types::BoundaryLevel};
use super::GeometrySource;

/// Serves `state.geojson`, `district.geojson` and `subdistrict.geojson` from
/// a directory. Child levels are filtered by their immediate parent's name.
#[derive(Debug)]
pub struct DirGeometrySource {
    dir: PathBuf,
    names: NameResolver,
    loaded: RefCell<AHashMap<BoundaryLevel, Arc<FeatureCollection>>>,
}

impl DirGeometrySource {
    pub fn new(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            bail!("[dir_source] Directory does not exist: {}", dir.display());
        }
        Ok(Self { dir: dir.to_path_buf(), names: NameResolver::default(), loaded: RefCell::default() })
    }

    pub fn with_names(mut self, names: NameResolver) -> Self {
        self.names = names;
        self
    }

    #[inline] pub fn dir(&self) -> &Path { &self.dir }

    /// Path of the file holding every region of `level`.
    pub fn file_for(&self, level: BoundaryLevel) -> PathBuf {
        self.dir.join(format!("{}.geojson", level.to_str()))
    }

    /// The whole `level` file, parsed once.
    fn load(&self, level: BoundaryLevel) -> Result<Arc<FeatureCollection>> {
        if let Some(collection) = self.loaded.borrow().get(&level) {
            return Ok(collection.clone());
        }
        let path = self.file_for(level);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("[dir_source] Failed to read {}", path.display()))?;
        let collection = Arc::new(FeatureCollection::from_geojson_bytes(&bytes)
            .with_context(|| format!("[dir_source] Failed to parse {}", path.display()))?);
        debug!(path = %path.display(), features = collection.len(), "boundary file loaded");
        self.loaded.borrow_mut().insert(level, collection.clone());
        Ok(collection)
    }
}

impl GeometrySource for DirGeometrySource {
    fn fetch(&self, level: BoundaryLevel, parents: &[Arc<str>]) -> Result<FeatureCollection> {
        let collection = self.load(level)?;
        let (Some(parent_level), Some(parent)) = (level.parent(), parents.last()) else {
            return Ok((*collection).clone());
        };

        let mut indices = self.names.matching(parent_level, &collection, parent);
        if indices.is_empty() {
            indices = collection.iter().enumerate()
                .filter(|(_, feature)| {
                    self.names.resolve(parent_level, &feature.properties)
                        .is_some_and(|name| name.eq_ignore_ascii_case(parent))
                })
                .map(|(i, _)| i)
                .collect();
        }
        Ok(collection.subset(&indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISTRICTS: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"ST_NM": "Punjab", "DISTRICT": "Amritsar"}, "geometry": null},
        {"type": "Feature", "properties": {"ST_NM": "Punjab", "DISTRICT": "Moga"}, "geometry": null},
        {"type": "Feature", "properties": {"ST_NM": "Haryana", "DISTRICT": "Ambala"}, "geometry": null}
    ]}"#;

    #[test]
    fn filters_by_parent_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("district.geojson"), DISTRICTS).unwrap();
        let source = DirGeometrySource::new(dir.path()).unwrap();

        let punjab = source.fetch(BoundaryLevel::District, &[Arc::<str>::from("Punjab")]).unwrap();
        assert_eq!(NameResolver::default().distinct_names(BoundaryLevel::District, &punjab), vec!["Amritsar", "Moga"]);

        let haryana = source.fetch(BoundaryLevel::District, &[Arc::<str>::from("HARYANA")]).unwrap();
        assert_eq!(haryana.len(), 1);

        assert!(source.fetch(BoundaryLevel::District, &[Arc::<str>::from("Kerala")]).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirGeometrySource::new(dir.path()).unwrap();
        let err = source.fetch(BoundaryLevel::State, &[]).unwrap_err();
        assert!(format!("{err:#}").contains("state.geojson"));
        assert!(DirGeometrySource::new(&dir.path().join("missing")).is_err());
    }
}
