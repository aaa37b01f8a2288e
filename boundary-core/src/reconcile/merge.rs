//! Fusion des géométries candidates d'un site

use geo::{Geometry, MultiPolygon, Polygon};

use crate::types::geometry_kind;
use crate::BoundaryError;

/// Fusionne les géométries appariées en une seule limite.
///
/// Une géométrie unique est reprise telle quelle. Plusieurs géométries sont
/// concaténées en un MultiPolygon, sans union : les chevauchements sont
/// conservés et leur surface comptée deux fois.
pub fn merge_geometries<'a>(
    site_id: &str,
    geometries: impl IntoIterator<Item = &'a Geometry>,
) -> Result<Geometry, BoundaryError> {
    let geometries: Vec<&Geometry> = geometries.into_iter().collect();

    match geometries.as_slice() {
        [] => Err(BoundaryError::invalid_geometry(site_id, "no geometry to merge")),
        [single] => match single {
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Ok((*single).clone()),
            other => Err(unmergeable(site_id, other)),
        },
        many => {
            let mut polygons: Vec<Polygon> = Vec::new();
            for geometry in many {
                match geometry {
                    Geometry::Polygon(p) => polygons.push(p.clone()),
                    Geometry::MultiPolygon(mp) => polygons.extend(mp.0.iter().cloned()),
                    other => return Err(unmergeable(site_id, other)),
                }
            }
            Ok(Geometry::MultiPolygon(MultiPolygon::new(polygons)))
        }
    }
}

fn unmergeable(site_id: &str, geometry: &Geometry) -> BoundaryError {
    BoundaryError::UnmergeableGeometry {
        site_id: site_id.to_string(),
        kind: geometry_kind(geometry).to_string(),
    }
}
