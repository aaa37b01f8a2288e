//! Commandes CLI

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use boundary_core::simplify::{count_points, simplify_geometry};
use boundary_core::{BoundaryError, ConservationFilter, MatchMode, ReconcileOptions, Reconciler};
use clap::Subcommand;
use tracing::info;

use site_sync::config::{self, RegistryConfig};
use site_sync::report::RunReport;
use site_sync::run::{load_records, save_changed};
use site_sync::source::{load_features, write_features};
use site_sync::store::SiteStore;

/// Tolérance par défaut des commandes simplify et filter (degrés)
const DEFAULT_TOLERANCE: f64 = 0.001;

#[derive(Subcommand)]
pub enum Commands {
    /// Apply authoritative boundaries from a GeoJSON source to the site store
    Reconcile {
        /// Sites directory (défaut : env SITE_SYNC_SITES_DIR)
        #[arg(long)]
        sites: Option<PathBuf>,

        /// Source FeatureCollection (GeoJSON)
        #[arg(short, long)]
        source: PathBuf,

        /// Registry preset (default, missouri) or path to a JSON registry
        #[arg(short, long, default_value = "default")]
        registry: String,

        /// Douglas-Peucker tolerance in degrees (défaut : env SITE_SYNC_TOLERANCE / 0.001)
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Provenance written to `geometrySource` (défaut : nom du fichier source)
        #[arg(long)]
        provenance: Option<String>,

        /// Fail on ambiguous matches instead of merging every candidate
        #[arg(long)]
        strict: bool,

        /// Worker threads; enables parallel processing
        #[arg(long, alias = "threads")]
        jobs: Option<usize>,

        /// Reconcile options file (JSON, champs absents = défauts)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Only process this site id
        #[arg(long)]
        site: Option<String>,

        /// Save the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Generate approximate polygons for sites without a boundary
    Approximate {
        /// Sites directory (défaut : env SITE_SYNC_SITES_DIR)
        #[arg(long)]
        sites: Option<PathBuf>,

        /// Area (km²) above which approximations are split into several parts
        #[arg(long)]
        threshold: Option<f64>,

        /// Save the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Simplify every polygon of a GeoJSON FeatureCollection
    Simplify {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Douglas-Peucker tolerance in degrees (défaut : env SITE_SYNC_TOLERANCE / 0.001)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Extract conservation areas from protected-area datasets
    Filter {
        /// One or more source FeatureCollections
        #[arg(short, long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        #[arg(short, long)]
        output: PathBuf,

        /// Minimum area in acres
        #[arg(long, default_value_t = 100.0)]
        min_acres: f64,

        /// Douglas-Peucker tolerance in degrees (défaut : env SITE_SYNC_TOLERANCE / 0.001)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },
}

/// Paramètres de la commande reconcile
pub struct ReconcileArgs {
    pub sites: Option<PathBuf>,
    pub source: PathBuf,
    pub registry: String,
    pub tolerance: Option<f64>,
    pub provenance: Option<String>,
    pub strict: bool,
    pub jobs: Option<usize>,
    pub options: Option<PathBuf>,
    pub site: Option<String>,
    pub report: Option<PathBuf>,
}

/// Exécute la commande reconcile
pub fn cmd_reconcile(args: ReconcileArgs) -> Result<RunReport> {
    let start = Instant::now();

    let mut options = match &args.options {
        Some(path) => config::load_options(path)?,
        None => ReconcileOptions::default(),
    };
    options.tolerance = config::tolerance(args.tolerance, options.tolerance)?;
    if args.strict {
        options.match_mode = MatchMode::Strict;
    }
    if args.jobs.is_some() {
        options.parallel = true;
    }

    let registry = RegistryConfig::resolve(&args.registry)?.into_registry()?;
    let store = SiteStore::open(config::sites_dir(args.sites)?)?;
    let reconciler = Reconciler::new(options)?;

    let ids: Vec<String> = match &args.site {
        Some(id) if registry.contains(id) => vec![id.clone()],
        Some(id) => return Err(BoundaryError::UnknownSite(id.clone()).into()),
        None => registry.iter().map(|identity| identity.id.clone()).collect(),
    };

    let source = load_features(&args.source)?;
    let provenance = args.provenance.unwrap_or_else(|| {
        args.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.source.display().to_string())
    });

    println!("=== Reconcile ===");
    println!("Source: {} ({} features)", args.source.display(), source.features.len());
    println!("Registry: {} ({} sites)", args.registry, registry.len());
    println!("Sites: {}", store.dir().display());
    println!("Tolerance: {}", reconciler.options().tolerance);
    println!("Match mode: {:?}", reconciler.options().match_mode);

    let mut report = RunReport::new("reconcile")
        .with_source(&args.source, source.checksum.clone())
        .with_provenance(&provenance);

    let mut records = load_records(&store, &ids, &mut report);
    let before = records.clone();

    let summary = run_with_jobs(args.jobs, || {
        reconciler.reconcile_batch(&registry, &mut records, &source.features, &provenance)
    })?;
    report.merge_summary(summary);

    let written = save_changed(&store, &before, &records, &mut report);
    info!(written, "Site files rewritten");

    report.set_duration(start.elapsed());
    report.finalize();
    info!("{}", report.summary());

    if let Some(path) = &args.report {
        report.save_to_file(path)?;
        println!("Report saved to {}", path.display());
    }

    Ok(report)
}

/// Exécute la commande approximate
pub fn cmd_approximate(
    sites: Option<PathBuf>,
    threshold: Option<f64>,
    report_path: Option<&Path>,
) -> Result<RunReport> {
    let start = Instant::now();

    let mut options = ReconcileOptions::default();
    if let Some(threshold) = threshold {
        if !(threshold > 0.0) {
            anyhow::bail!("Threshold must be positive, got {}", threshold);
        }
        options.multipart_threshold_km2 = threshold;
    }

    let store = SiteStore::open(config::sites_dir(sites)?)?;
    let reconciler = Reconciler::new(options)?;
    let ids = store.list_ids()?;

    println!("=== Approximate ===");
    println!("Sites: {} ({} files)", store.dir().display(), ids.len());
    println!(
        "Multipart threshold: {} km²",
        reconciler.options().multipart_threshold_km2
    );

    let mut report = RunReport::new("approximate");
    let mut records = load_records(&store, &ids, &mut report);
    let before = records.clone();

    report.merge_summary(reconciler.approximate_batch(&mut records));
    let written = save_changed(&store, &before, &records, &mut report);
    info!(written, "Site files rewritten");

    report.set_duration(start.elapsed());
    report.finalize();
    info!("{}", report.summary());

    if let Some(path) = report_path {
        report.save_to_file(path)?;
        println!("Report saved to {}", path.display());
    }

    Ok(report)
}

/// Statistiques de simplification
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifyStats {
    pub features: usize,
    pub points_before: usize,
    pub points_after: usize,
}

impl SimplifyStats {
    pub fn reduction_pct(&self) -> f64 {
        if self.points_before == 0 {
            return 0.0;
        }
        (1.0 - self.points_after as f64 / self.points_before as f64) * 100.0
    }

    fn display(&self) {
        println!("Features: {}", self.features);
        println!("Points: {} -> {}", self.points_before, self.points_after);
        println!("Reduction: {:.1}%", self.reduction_pct());
    }
}

/// Exécute la commande simplify
pub fn cmd_simplify(input: &Path, output: &Path, tolerance: Option<f64>) -> Result<SimplifyStats> {
    let tolerance = config::tolerance(tolerance, DEFAULT_TOLERANCE)?;
    let mut features = load_features(input)?.features;

    let stats = simplify_all(&mut features, tolerance)?;
    write_features(&features, output)?;

    println!("=== Simplify ===");
    println!("Tolerance: {}", tolerance);
    stats.display();
    print_size_change(input, output);

    Ok(stats)
}

/// Exécute la commande filter
pub fn cmd_filter(
    inputs: &[PathBuf],
    output: &Path,
    min_acres: f64,
    tolerance: Option<f64>,
) -> Result<SimplifyStats> {
    let tolerance = config::tolerance(tolerance, DEFAULT_TOLERANCE)?;
    let filter = ConservationFilter::default().with_min_acres(min_acres);

    let mut all = Vec::new();
    for input in inputs {
        let data = load_features(input)?;
        info!(source = %input.display(), features = data.features.len(), "Dataset loaded");
        all.extend(data.features);
    }
    let total = all.len();

    let mut kept = filter.apply(all);
    info!(total, kept = kept.len(), min_acres, "Conservation areas selected");

    let stats = simplify_all(&mut kept, tolerance)?;
    write_features(&kept, output)?;

    println!("=== Filter ===");
    println!("Inputs: {}", inputs.len());
    println!("Conservation areas: {} of {}", kept.len(), total);
    for feature in kept.iter().take(10) {
        println!(
            "  {} ({:.0} acres)",
            filter.unit_name(feature).unwrap_or_else(|| "Unnamed".to_string()),
            filter.acres(feature)
        );
    }
    stats.display();
    print_size_change(inputs.first().map(PathBuf::as_path).unwrap_or(output), output);

    Ok(stats)
}

fn simplify_all(
    features: &mut [boundary_core::SourceFeature],
    tolerance: f64,
) -> Result<SimplifyStats> {
    let mut stats = SimplifyStats {
        features: features.len(),
        points_before: 0,
        points_after: 0,
    };

    for (i, feature) in features.iter_mut().enumerate() {
        let context = feature.id.clone().unwrap_or_else(|| format!("feature {}", i));
        let simplified = simplify_geometry(&feature.geometry, tolerance, &context)?;
        stats.points_before += count_points(&feature.geometry);
        stats.points_after += count_points(&simplified);
        feature.geometry = simplified;
    }

    Ok(stats)
}

fn print_size_change(input: &Path, output: &Path) {
    let size = |p: &Path| std::fs::metadata(p).map(|m| m.len()).ok();
    if let (Some(before), Some(after)) = (size(input), size(output)) {
        println!(
            "File size: {:.1} KB -> {:.1} KB",
            before as f64 / 1024.0,
            after as f64 / 1024.0
        );
    }
}

fn run_with_jobs<T: Send>(jobs: Option<usize>, f: impl FnOnce() -> T + Send) -> Result<T> {
    match jobs {
        Some(jobs) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs.max(1))
                .build()
                .context("Failed to build thread pool")?;
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}
