//! Tests d'intégration : registre, fichiers de sites, source GeoJSON et rapport

use std::path::{Path, PathBuf};

use boundary_core::{DataQuality, ReconcileOptions, Reconciler, SiteRecord};
use serde_json::{json, Value};
use site_sync::config::RegistryConfig;
use site_sync::report::{RunReport, RunStatus};
use site_sync::run::{load_records, save_changed};
use site_sync::source::load_features;
use site_sync::store::SiteStore;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("site_sync_it_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Carré de `side` degrés centré sur (lat, lng), densifié sur chaque côté
fn dense_square(lat: f64, lng: f64, side: f64, per_side: usize) -> Vec<[f64; 2]> {
    let h = side / 2.0;
    let corners = [
        [lng - h, lat - h],
        [lng + h, lat - h],
        [lng + h, lat + h],
        [lng - h, lat + h],
    ];
    let mut ring = Vec::new();
    for k in 0..4 {
        let [x0, y0] = corners[k];
        let [x1, y1] = corners[(k + 1) % 4];
        for i in 0..per_side {
            let t = i as f64 / per_side as f64;
            ring.push([x0 + (x1 - x0) * t, y0 + (y1 - y0) * t]);
        }
    }
    ring.push(ring[0]);
    ring
}

#[test]
fn test_reconcile_run_end_to_end() {
    let dir = temp_dir("reconcile");
    let sites_dir = dir.join("sites");
    std::fs::create_dir_all(&sites_dir).unwrap();

    // Site à mettre à jour, avec des champs inconnus à conserver
    write_json(
        &sites_dir.join("mingo-nwr.json"),
        &json!({
            "id": "mingo-nwr",
            "name": "Mingo National Wildlife Refuge",
            "location": { "lat": 36.97, "lng": -90.15, "state": "MO", "county": "Stoddard" },
            "geometry": { "type": "Point", "coordinates": [-90.15, 36.97] },
            "area": { "km2": 100.0 },
            "activities": ["birding", "hiking"],
            "metadata": { "dataQuality": "low", "source": "crawler", "reviewer": "jd" }
        }),
    );

    // Site figé : ne doit jamais être réécrit
    let frozen = json!({
        "id": "bell-mountain",
        "name": "Bell Mountain Wilderness",
        "geometry": { "type": "Polygon", "coordinates": [[[-91.0, 37.0], [-90.9, 37.0], [-90.9, 37.1], [-91.0, 37.0]]] },
        "metadata": { "dataQuality": "high", "geometrySource": "USFS" }
    });
    let frozen_path = sites_dir.join("bell-mountain.json");
    write_json(&frozen_path, &frozen);
    let frozen_bytes = std::fs::read(&frozen_path).unwrap();

    // Fichier corrompu : échec isolé
    std::fs::write(sites_dir.join("broken-site.json"), "{ not json").unwrap();

    let source_path = dir.join("padus.geojson");
    write_json(
        &source_path,
        &json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "ORGNAME": "Mingo NWR" },
                    "geometry": { "type": "Polygon", "coordinates": [dense_square(36.97, -90.15, 0.1, 200)] }
                },
                {
                    "type": "Feature",
                    "properties": { "Unit_Nm": "Bell Mountain Wilderness" },
                    "geometry": { "type": "Polygon", "coordinates": [dense_square(37.05, -90.95, 0.1, 50)] }
                }
            ]
        }),
    );

    let registry: RegistryConfig = serde_json::from_value(json!({
        "mingo-nwr": { "names": ["Mingo National Wildlife Refuge"], "designation": "National Wildlife Refuge" },
        "bell-mountain": { "names": ["Bell Mountain Wilderness"] },
        "broken-site": { "names": ["Broken Site"] },
        "arctic-nwr": { "names": ["Arctic National Wildlife Refuge"] }
    }))
    .unwrap();
    let registry = registry.into_registry().unwrap();
    let ids: Vec<String> = registry.iter().map(|s| s.id.clone()).collect();

    let store = SiteStore::open(&sites_dir).unwrap();
    let source = load_features(&source_path).unwrap();
    assert_eq!(source.features.len(), 2);

    let mut report = RunReport::new("reconcile").with_source(&source_path, source.checksum.clone());
    let mut records = load_records(&store, &ids, &mut report);
    assert_eq!(records.len(), 2);

    let before = records.clone();
    let reconciler = Reconciler::new(ReconcileOptions::default()).unwrap();
    report.merge_summary(reconciler.reconcile_batch(
        &registry,
        &mut records,
        &source.features,
        "PAD-US 3.0",
    ));
    assert_eq!(save_changed(&store, &before, &records, &mut report), 1);
    report.finalize();

    assert_eq!(report.summary.updated, 1);
    assert_eq!(report.summary.skipped_high_quality, 1);
    assert_eq!(report.summary.skipped_other, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.missing_sites, vec!["arctic-nwr"]);
    assert_eq!(report.sites_processed, 4);
    assert_eq!(report.sites_processed, report.summary.total());
    assert_eq!(report.status, RunStatus::PartialSuccess);

    // Le site figé n'a pas été touché, octet pour octet
    assert_eq!(std::fs::read(&frozen_path).unwrap(), frozen_bytes);

    let raw: Value =
        serde_json::from_str(&std::fs::read_to_string(sites_dir.join("mingo-nwr.json")).unwrap())
            .unwrap();
    assert_eq!(raw["geometry"]["type"], "Polygon");
    assert_eq!(raw["metadata"]["dataQuality"], "high");
    assert_eq!(raw["metadata"]["geometrySource"], "PAD-US 3.0");
    assert_eq!(raw["metadata"]["reviewer"], "jd");
    assert_eq!(raw["activities"][1], "hiking");
    assert_eq!(raw["location"]["county"], "Stoddard");

    // Le carré densifié se réduit à ses coins
    let ring = raw["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(ring.len(), 5);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_approximate_run_end_to_end() {
    let dir = temp_dir("approximate");
    let store = SiteStore::open(&dir).unwrap();

    store
        .save(
            &SiteRecord::new("irish-wilderness", "Irish Wilderness", 36.75, -91.1)
                .with_area(boundary_core::SiteArea::from_acres(16_500.0)),
        )
        .unwrap();
    // Sans surface de référence : échec isolé
    store
        .save(&SiteRecord::new("no-area", "No Area", 37.0, -92.0))
        .unwrap();

    let ids = store.list_ids().unwrap();
    let mut report = RunReport::new("approximate");
    let mut records = load_records(&store, &ids, &mut report);
    let before = records.clone();

    let reconciler = Reconciler::new(ReconcileOptions::default()).unwrap();
    report.merge_summary(reconciler.approximate_batch(&mut records));
    assert_eq!(save_changed(&store, &before, &records, &mut report), 1);
    report.finalize();

    assert_eq!(report.summary.updated, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.status, RunStatus::PartialSuccess);

    let irish = store.load("irish-wilderness").unwrap();
    assert!(irish.has_boundary());
    assert_eq!(irish.metadata.data_quality, DataQuality::Medium);
    assert_eq!(irish.metadata.approximate_area, Some(true));

    // Un second passage ne régénère rien
    let mut again = vec![irish.clone()];
    let summary = reconciler.approximate_batch(&mut again);
    assert_eq!(summary.updated, 0);
    assert_eq!(again[0], irish);

    let _ = std::fs::remove_dir_all(&dir);
}
