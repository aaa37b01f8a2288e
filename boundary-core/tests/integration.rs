//! Tests d'intégration : de la FeatureCollection au site mis à jour

use std::f64::consts::PI;

use boundary_core::metrics::{centroid, geometry_area};
use boundary_core::simplify::count_points;
use boundary_core::{
    features_from_collection, DataQuality, ReconcileOptions, Reconciler, SiteArea, SiteIdentity,
    SiteOutcome, SiteRecord, SiteRegistry,
};
use geo::{Coord, Geometry, LineString, MultiPolygon, Polygon};
use serde_json::json;

/// Anneau circulaire dense avec un léger bruit radial
fn noisy_ring(lat: f64, lng: f64, radius: f64, points: usize) -> Vec<[f64; 2]> {
    let mut ring: Vec<[f64; 2]> = (0..points - 1)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / (points - 1) as f64;
            let noise = 0.0002 * ((i * 31) % 7) as f64 / 7.0;
            let r = radius + noise;
            [lng + r * angle.cos(), lat + r * angle.sin()]
        })
        .collect();
    ring.push(ring[0]);
    ring
}

fn to_polygon(ring: &[[f64; 2]]) -> Polygon {
    let coords: Vec<Coord> = ring.iter().map(|&[x, y]| Coord { x, y }).collect();
    Polygon::new(LineString::new(coords), vec![])
}

#[test]
fn test_large_multipolygon_end_to_end() {
    let west = noisy_ring(37.0, -91.4, 0.2, 25_000);
    let east = noisy_ring(37.1, -90.9, 0.15, 25_000);

    let raw = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "FORESTNAME": "Mark Twain National Forest" },
                "geometry": { "type": "MultiPolygon", "coordinates": [[west], [east]] }
            },
            {
                "type": "Feature",
                "properties": { "FORESTNAME": "Shawnee National Forest" },
                "geometry": { "type": "Polygon", "coordinates": [noisy_ring(37.5, -88.6, 0.1, 100)] }
            }
        ]
    });
    let collection: geojson::FeatureCollection = serde_json::from_value(raw).unwrap();
    let (features, errors) = features_from_collection(collection);
    assert!(errors.is_empty());
    assert_eq!(features.len(), 2);

    let original = Geometry::MultiPolygon(MultiPolygon::new(vec![
        to_polygon(&west),
        to_polygon(&east),
    ]));
    assert_eq!(count_points(&original), 50_000);
    let reference_km2 = geometry_area(&original);

    let registry = SiteRegistry::new([SiteIdentity::new(
        "mark-twain-nf",
        ["Mark Twain National Forest"],
        Some("National Forest"),
    )]);
    let mut record = SiteRecord::new("mark-twain-nf", "Mark Twain National Forest", 37.0, -91.2)
        .with_area(SiteArea {
            km2: Some(reference_km2),
            ..Default::default()
        })
        .with_quality(DataQuality::Medium);
    record.metadata.approximate_area = Some(true);
    let mut records = vec![record];

    let reconciler = Reconciler::new(ReconcileOptions {
        tolerance: 0.01,
        ..Default::default()
    })
    .unwrap();
    let summary = reconciler.reconcile_batch(&registry, &mut records, &features, "USFS");

    assert_eq!(summary.updated, 1, "failures: {:?}", summary.failures);
    assert_eq!(summary.failed, 0);

    let record = &records[0];
    let points = count_points(&record.geometry);
    assert!(points < 25_000, "{} points kept", points);
    assert_eq!(record.metadata.data_quality, DataQuality::High);
    assert_eq!(record.metadata.approximate_area, None);
    assert_eq!(record.metadata.geometry_source.as_deref(), Some("USFS"));

    // Le fichier réécrit ne garde pas la marque d'approximation
    let written = serde_json::to_value(record).unwrap();
    assert_eq!(written["metadata"]["dataQuality"], "high");
    assert!(written["metadata"].get("approximateArea").is_none());
    assert!(written["metadata"]["lastUpdated"].is_string());
    assert_eq!(written["geometry"]["type"], "MultiPolygon");

    let c = centroid(&record.geometry).unwrap();
    assert!((c.lat - 37.05).abs() < 0.08);
}

#[test]
fn test_high_quality_site_is_never_rewritten() {
    let stored = json!({
        "id": "irish-wilderness",
        "name": "Irish Wilderness",
        "location": { "lat": 36.75, "lng": -91.1, "state": "MO" },
        "geometry": { "type": "Polygon", "coordinates": [noisy_ring(36.75, -91.1, 0.05, 40)] },
        "area": { "acres": 16500 },
        "metadata": { "dataQuality": "high", "geometrySource": "PAD-US 3.0", "lastUpdated": "2023-01-15" },
        "photos": ["a.jpg"]
    });
    let mut records: Vec<SiteRecord> = vec![serde_json::from_value(stored.clone()).unwrap()];
    let before = records[0].clone();

    let raw = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "name": "Irish Wilderness" },
            "geometry": { "type": "Polygon", "coordinates": [noisy_ring(36.7, -91.0, 0.08, 200)] }
        }]
    });
    let (features, _) = features_from_collection(serde_json::from_value(raw).unwrap());
    let registry = SiteRegistry::new([SiteIdentity::new(
        "irish-wilderness",
        ["Irish Wilderness"],
        None,
    )]);

    let reconciler = Reconciler::new(ReconcileOptions::default()).unwrap();
    let summary = reconciler.reconcile_batch(&registry, &mut records, &features, "other");
    assert_eq!(summary.skipped_high_quality, 1);

    let summary = reconciler.approximate_batch(&mut records);
    assert_eq!(summary.skipped_high_quality, 1);

    assert_eq!(records[0], before);
    assert_eq!(serde_json::to_value(&records[0]).unwrap()["photos"], json!(["a.jpg"]));
}

#[test]
fn test_approximation_then_reconciliation() {
    let mut record = SiteRecord::new("hercules-glades", "Hercules Glades", 36.68, -92.9)
        .with_area(SiteArea::from_acres(12_315.0));
    let reconciler = Reconciler::new(ReconcileOptions::default()).unwrap();

    let outcome = reconciler.approximate(&mut record).unwrap();
    assert!(matches!(outcome, SiteOutcome::Approximated { .. }));
    assert_eq!(record.metadata.data_quality, DataQuality::Medium);
    assert_eq!(record.metadata.approximate_area, Some(true));

    // Une vraie limite remplace l'approximation (medium < high)
    let reference = record.reference_area_km2().unwrap();
    let radius_deg = (reference / PI).sqrt() / 111.32;
    let raw = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": { "Unit_Nm": "Hercules-Glades Wilderness" },
            "geometry": { "type": "Polygon", "coordinates": [noisy_ring(36.68, -92.9, radius_deg, 500)] }
        }]
    });
    let (features, _) = features_from_collection(serde_json::from_value(raw).unwrap());
    let identity = SiteIdentity::new("hercules-glades", ["Hercules Glades"], None);

    let outcome = reconciler
        .reconcile(&identity, &mut record, &features, "PAD-US 3.0")
        .unwrap();
    assert!(matches!(outcome, SiteOutcome::Updated { sources: 1, .. }));
    assert_eq!(record.metadata.data_quality, DataQuality::High);
    assert_eq!(record.metadata.approximate_area, None);
}
