use geo::{BoundingRect, Contains, Coord, MultiPolygon, Point, Rect};
use rstar::{primitives::{GeomWithData, Rectangle}, RTree, AABB};
use serde_json::{Map, Value};

/// Envelope of one feature's shape, tagged with the feature's index.
type ShapeEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Property bag attached to a feature. Key names vary between datasets.
pub type Properties = Map<String, Value>;

/// A single named shape with its property bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<Value>,
    pub shape: MultiPolygon<f64>, // Empty when the source geometry was null or unsupported
    pub properties: Properties,
}

impl Feature {
    pub fn new(shape: MultiPolygon<f64>, properties: Properties) -> Self {
        Self { id: None, shape, properties }
    }

    /// Numeric property value, accepting numbers and numeric strings.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A set of features with a spatial index for hit-testing.
#[derive(Debug, Clone)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    rtree: RTree<ShapeEnvelope>,
}

impl Default for FeatureCollection {
    fn default() -> Self { Self::new(Vec::new()) }
}

impl FeatureCollection {
    /// Construct a collection and bulk-load its R-tree.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                features.iter().enumerate()
                    .filter_map(|(i, feature)| feature.shape.bounding_rect().map(|rect| envelope(i, rect)))
                    .collect()
            ),
            features,
        }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Feature] { &self.features }

    #[inline] pub fn get(&self, idx: usize) -> Option<&Feature> { self.features.get(idx) }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> { self.features.iter() }

    /// Bounding rectangle of all shapes, `None` if no feature has geometry.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features.iter()
            .filter_map(|feature| feature.shape.bounding_rect())
            .reduce(union_rect)
    }

    /// Bounding rectangle of the features at `indices`.
    pub fn bounds_of(&self, indices: &[usize]) -> Option<Rect<f64>> {
        indices.iter()
            .filter_map(|&i| self.features.get(i))
            .filter_map(|feature| feature.shape.bounding_rect())
            .reduce(union_rect)
    }

    /// Index of the first feature whose shape contains `point`.
    pub fn feature_at(&self, point: Point<f64>) -> Option<usize> {
        let mut hits: Vec<usize> = self.rtree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x(), point.y()]))
            .map(|entry| entry.data)
            .filter(|&i| self.features[i].shape.contains(&point))
            .collect();
        hits.sort_unstable();
        hits.first().copied()
    }

    /// Copy of the features at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> FeatureCollection {
        FeatureCollection::new(indices.iter().filter_map(|&i| self.features.get(i).cloned()).collect())
    }
}

fn envelope(idx: usize, rect: Rect<f64>) -> ShapeEnvelope {
    GeomWithData::new(Rectangle::from_corners(rect.min().into(), rect.max().into()), idx)
}

/// Smallest rectangle covering both inputs.
#[inline]
pub(crate) fn union_rect(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    let (lo, hi) = (a.min(), a.max());
    let (other_lo, other_hi) = (b.min(), b.max());
    Rect::new(
        Coord { x: lo.x.min(other_lo.x), y: lo.y.min(other_lo.y) },
        Coord { x: hi.x.max(other_hi.x), y: hi.y.max(other_hi.y) },
    )
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        FeatureCollection::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon, Point};
    use serde_json::json;

    use super::*;

    fn square(x: f64, y: f64, name: &str) -> Feature {
        let poly = polygon![(x: x, y: y), (x: x + 1.0, y: y), (x: x + 1.0, y: y + 1.0), (x: x, y: y + 1.0), (x: x, y: y)];
        let mut props = Properties::new();
        props.insert("name".into(), json!(name));
        Feature::new(MultiPolygon(vec![poly]), props)
    }

    #[test]
    fn bounds_cover_all_shapes() {
        let fc = FeatureCollection::new(vec![square(0.0, 0.0, "a"), square(3.0, 2.0, "b")]);
        let rect = fc.bounds().unwrap();
        assert_eq!(rect.min().x, 0.0);
        assert_eq!(rect.max().x, 4.0);
        assert_eq!(rect.max().y, 3.0);
        assert_eq!(fc.bounds_of(&[1]).unwrap().min().x, 3.0);
    }

    #[test]
    fn empty_collection_has_no_bounds() {
        assert!(FeatureCollection::default().bounds().is_none());
        let shapeless = Feature::new(MultiPolygon(vec![]), Properties::new());
        assert!(FeatureCollection::new(vec![shapeless]).bounds().is_none());
    }

    #[test]
    fn hit_test_finds_containing_shape() {
        let fc = FeatureCollection::new(vec![square(0.0, 0.0, "a"), square(3.0, 2.0, "b")]);
        assert_eq!(fc.feature_at(Point::new(3.5, 2.5)), Some(1));
        assert_eq!(fc.feature_at(Point::new(0.5, 0.5)), Some(0));
        assert_eq!(fc.feature_at(Point::new(2.0, 2.0)), None);
    }

    #[test]
    fn numbers_from_strings() {
        let mut f = square(0.0, 0.0, "a");
        f.properties.insert("ph".into(), json!("6.8"));
        f.properties.insert("N".into(), json!(140));
        assert_eq!(f.number("ph"), Some(6.8));
        assert_eq!(f.number("N"), Some(140.0));
        assert_eq!(f.number("name"), None);
    }
}
