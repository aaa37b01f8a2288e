//! Mesures géométriques : centroïde, surface planaire, polygones approchés
//!
//! Toutes les coordonnées sont en degrés (x = lng, y = lat), les surfaces en km².

pub mod approximate;
pub mod area;
pub mod centroid;

pub use approximate::{
    default_point_count, generate_approximate_geometry, generate_approximate_polygon, site_seed,
    DEFAULT_MULTIPART_THRESHOLD_KM2, MAX_PARTS,
};
pub use area::{
    acres_to_hectares, acres_to_km2, geometry_area, planar_area, polygon_area,
    square_miles_to_acres, square_miles_to_km2, KM_PER_DEGREE,
};
pub use centroid::{centroid, LatLng};
