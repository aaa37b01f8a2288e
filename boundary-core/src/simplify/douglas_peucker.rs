//! Douglas-Peucker itératif (pile explicite d'intervalles)

use geo::Coord;

/// Distance d'un point à la droite infinie passant par `start` et `end`.
///
/// Si `start == end`, retourne la distance euclidienne au point.
pub fn perpendicular_distance(point: Coord, start: Coord, end: Coord) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx == 0.0 && dy == 0.0 {
        return ((point.x - start.x).powi(2) + (point.y - start.y).powi(2)).sqrt();
    }

    let numerator = (dy * point.x - dx * point.y + end.x * start.y - end.y * start.x).abs();
    numerator / (dx * dx + dy * dy).sqrt()
}

/// Simplifie une polyligne avec Douglas-Peucker.
///
/// Le résultat est une sous-séquence de l'entrée qui contient toujours les
/// deux extrémités. Une entrée de 2 points ou moins est retournée telle quelle.
///
/// Chaque intervalle `[start, end]` est traité depuis une pile : la profondeur
/// ne dépend pas de la forme de l'anneau, contrairement à la forme récursive.
pub fn simplify_ring(points: &[Coord], tolerance: f64) -> Vec<Coord> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];

    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let (index, distance) = farthest_point(points, start, end);

        if distance > tolerance {
            keep[index] = true;
            stack.push((index, end));
            stack.push((start, index));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(coord, kept)| kept.then_some(*coord))
        .collect()
}

/// Point intérieur le plus éloigné de la droite `[start, end]`.
///
/// En cas d'égalité, le premier indice gagne (comme la version récursive).
pub(crate) fn farthest_point(points: &[Coord], start: usize, end: usize) -> (usize, f64) {
    let mut max_distance = 0.0;
    let mut max_index = start;

    for (i, point) in points.iter().enumerate().take(end).skip(start + 1) {
        let distance = perpendicular_distance(*point, points[start], points[end]);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    (max_index, max_distance)
}
