//! Validation et simplification des anneaux fermés

use geo::{Coord, LineString};

use super::douglas_peucker::{farthest_point, perpendicular_distance, simplify_ring};
use crate::BoundaryError;

/// Nombre minimal de points d'un anneau fermé valide
pub const MIN_RING_POINTS: usize = 4;

/// Vérifie qu'un anneau a au moins 4 points, est fermé et sans NaN
pub fn validate_ring(ring: &LineString, context: &str) -> Result<(), BoundaryError> {
    let coords = &ring.0;

    if coords.len() < MIN_RING_POINTS {
        return Err(BoundaryError::invalid_geometry(
            context,
            format!("ring has {} points (minimum {})", coords.len(), MIN_RING_POINTS),
        ));
    }

    if let Some(bad) = coords.iter().position(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(BoundaryError::invalid_geometry(
            context,
            format!("non-finite coordinate at index {}", bad),
        ));
    }

    if coords.first() != coords.last() {
        return Err(BoundaryError::invalid_geometry(context, "ring is not closed"));
    }

    Ok(())
}

/// Simplifie un anneau fermé en garantissant au moins 4 points.
///
/// Si Douglas-Peucker réduit l'anneau sous 4 points, on conserve le départ,
/// le sommet le plus éloigné du départ, puis le sommet restant le plus
/// éloigné de cette corde, dans l'ordre d'origine.
pub fn simplify_closed_ring(
    ring: &LineString,
    tolerance: f64,
    context: &str,
) -> Result<LineString, BoundaryError> {
    validate_ring(ring, context)?;

    let simplified = simplify_ring(&ring.0, tolerance);
    if simplified.len() >= MIN_RING_POINTS {
        return Ok(LineString::new(simplified));
    }

    Ok(LineString::new(minimal_ring(&ring.0)))
}

/// Anneau minimal (4 points) extrait d'un anneau fermé valide
fn minimal_ring(coords: &[Coord]) -> Vec<Coord> {
    let last = coords.len() - 1;
    let start = coords[0];

    // Anneau fermé : l'ancre est dégénérée, la distance est celle au départ
    let (first, _) = farthest_point(coords, 0, last);
    let first = first.max(1);

    let mut second = None;
    let mut max_distance = -1.0;
    for (i, coord) in coords.iter().enumerate().take(last).skip(1) {
        if i == first {
            continue;
        }
        let distance = perpendicular_distance(*coord, start, coords[first]);
        if distance > max_distance {
            max_distance = distance;
            second = Some(i);
        }
    }

    // Au moins deux sommets intérieurs puisque l'anneau a 4 points ou plus
    let second = second.unwrap_or(if first == 1 { 2 } else { 1 });
    let (a, b) = if first < second {
        (first, second)
    } else {
        (second, first)
    };

    vec![start, coords[a], coords[b], coords[last]]
}
