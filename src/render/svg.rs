use std::{fs::File, io::{BufWriter, Write}, path::Path};

use ahash::AHashMap;
use anyhow::{anyhow, Context, Result};
use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};

use crate::{geom::{union_rect, FeatureCollection}, style::ShapeStyle};
use super::{LayerHandle, MapRenderer};

/// Projection function: lon/lat -> SVG coords (x,y)
type Projection = dyn Fn(&Coord<f64>) -> (f64, f64);

/// Headless renderer that keeps the mounted layers and viewport in memory
/// and draws them as an SVG document.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    next_id: u64,
    layers: AHashMap<u64, (FeatureCollection, Vec<ShapeStyle>)>,
    order: Vec<u64>,
    viewport: Option<(Rect<f64>, f64)>,
}

impl SvgRenderer {
    pub fn new() -> Self { Self::default() }

    /// Number of layers currently mounted.
    #[inline] pub fn layer_count(&self) -> usize { self.layers.len() }

    /// Last fitted bounds and padding.
    #[inline] pub fn viewport(&self) -> Option<(Rect<f64>, f64)> { self.viewport }

    /// Mounted layers in mount order.
    pub fn layers(&self) -> impl Iterator<Item = (&FeatureCollection, &[ShapeStyle])> {
        self.order.iter()
            .filter_map(|id| self.layers.get(id))
            .map(|(features, styles)| (features, styles.as_slice()))
    }

    /// Small wrapper with defaults.
    pub fn to_svg(&self, path: &Path) -> Result<()> {
        self.to_svg_with_size(path, 1200, 20)
    }

    pub fn to_svg_with_size(&self, path: &Path, width: i32, margin: i32) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("[to_svg] Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_svg(&mut writer, width as f64, margin as f64)?;
        writer.flush()?;
        Ok(())
    }

    /// Render the document to a string.
    pub fn to_svg_string(&self, width: i32, margin: i32) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_svg(&mut buffer, width as f64, margin as f64)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Write every mounted layer, projected onto the current viewport
    /// (or the layers' combined bounds if the camera was never fitted).
    pub fn write_svg(&self, writer: &mut impl Write, width: f64, margin: f64) -> Result<()> {
        let bounds = self.viewport.map(|(rect, _)| rect)
            .or_else(|| self.layers().filter_map(|(features, _)| features.bounds()).reduce(union_rect))
            .ok_or_else(|| anyhow!("[to_svg] Could not determine bounds; nothing to draw."))?;

        // Equirectangular, squeezed by cos(latitude) at the middle of the view.
        let mid_lat = (bounds.min().y + bounds.max().y) / 2.0;
        let kx = mid_lat.to_radians().cos().max(1e-6);
        let span_x = (bounds.width() * kx).max(1e-9);
        let scale = (width - 2.0 * margin) / span_x;
        let height = bounds.height() * scale + 2.0 * margin;

        // lon/lat -> SVG coords (Y down)
        let project = move |coord: &Coord<f64>| -> (f64, f64) {
            let x = margin + (coord.x - bounds.min().x) * kx * scale;
            let y = margin + (bounds.max().y - coord.y) * scale;
            (x, y)
        };

        write_header(writer, width, height, &bounds)?;
        for (features, styles) in self.layers() {
            writeln!(writer, "<g>")?;
            for (feature, style) in features.iter().zip(styles) {
                if feature.shape.0.is_empty() { continue }
                writeln!(writer,
                    r#"<path fill-rule="evenodd" style="fill:{};fill-opacity:{};stroke:{};stroke-width:{}" d="{}"/>"#,
                    style.fill, style.fill_opacity, style.stroke, style.weight,
                    multipolygon_to_path(&feature.shape, &project),
                )?;
            }
            writeln!(writer, "</g>")?;
        }
        writeln!(writer, "</svg>")?;
        Ok(())
    }
}

impl MapRenderer for SvgRenderer {
    fn mount(&mut self, features: &FeatureCollection, styles: &[ShapeStyle]) -> LayerHandle {
        self.next_id += 1;
        self.layers.insert(self.next_id, (features.clone(), styles.to_vec()));
        self.order.push(self.next_id);
        LayerHandle::new(self.next_id)
    }

    fn unmount(&mut self, handle: LayerHandle) {
        self.layers.remove(&handle.id());
        self.order.retain(|&id| id != handle.id());
    }

    fn restyle(&mut self, handle: &LayerHandle, styles: &[ShapeStyle]) {
        if let Some((_, current)) = self.layers.get_mut(&handle.id()) {
            *current = styles.to_vec();
        }
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>, padding: f64) {
        self.viewport = Some((bounds, padding));
    }
}

fn write_header(writer: &mut impl Write, width: f64, height: f64, bounds: &Rect<f64>) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(writer, r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.3} {height:.3}" data-lon-min="{}" data-lon-max="{}" data-lat-min="{}" data-lat-max="{}">"##,
        bounds.min().x, bounds.max().x, bounds.min().y, bounds.max().y,
    )?;
    writeln!(writer, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();
    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), project, &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, project, &mut out);
        }
    }
    out
}

/// Append a ring as an SVG subpath: "M x,y L x,y ... Z"
fn ring_to_path(ring: &LineString<f64>, project: &Projection, out: &mut String) {
    let mut coords = ring.coords_iter().map(|coord| project(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }
}
