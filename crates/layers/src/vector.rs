use geography::GeoCollection;
use scene::ProjectionEngine;

use crate::path::{SubPath, project_geometry};

/// One feature's projected outline.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryShape {
    pub name: Option<String>,
    /// Filled with the land color when true, stroked only otherwise.
    pub areal: bool,
    pub paths: Vec<SubPath>,
}

/// Landmass and boundary shapes for the live projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryLayer {
    shapes: Vec<BoundaryShape>,
}

impl BoundaryLayer {
    /// Projects every feature in collection order. Features with nothing
    /// visible are left out.
    pub fn build(collection: &GeoCollection, engine: &ProjectionEngine) -> Self {
        let shapes = collection
            .features
            .iter()
            .filter_map(|feature| {
                let paths = project_geometry(engine, &feature.geometry);
                (!paths.is_empty()).then(|| BoundaryShape {
                    name: feature.name().map(str::to_string),
                    areal: feature.geometry.is_areal(),
                    paths,
                })
            })
            .collect();
        Self { shapes }
    }

    pub fn shapes(&self) -> &[BoundaryShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.shapes
            .iter()
            .flat_map(|s| &s.paths)
            .map(|p| p.points.len())
            .sum()
    }
}
