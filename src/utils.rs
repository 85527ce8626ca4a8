use crate::classify::{ClassificationResult, WaterClass};
use crate::raster::Raster;
use tracing::info;

/// Mean of the valid cells, `None` when every cell is no-data
pub fn valid_mean(raster: &Raster) -> Option<f64> {
    let (sum, n) = raster
        .data()
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn log_raster_statistics(name: &str, raster: &Raster) {
    let valid = raster.valid_count();
    match (raster.min_max(), valid_mean(raster)) {
        (Some((min, max)), Some(mean)) => info!(
            "{}: min {:.4}, max {:.4}, mean {:.4}, valid pixels {} / {} ({:.1}%)",
            name,
            min,
            max,
            mean,
            valid,
            raster.len(),
            100.0 * valid as f64 / raster.len() as f64
        ),
        _ => info!("{}: no valid pixels", name),
    }
}

pub fn log_class_summary(result: &ClassificationResult) {
    let counts = result.class_counts();
    let total: usize = counts.values().sum();

    info!(
        "Classified {} / {} pixels",
        result.classified_count(),
        total
    );
    for class in std::iter::once(WaterClass::Unclassified).chain(WaterClass::CLASSES) {
        let n = counts.get(&class).copied().unwrap_or(0);
        info!(
            "  {} {:<14} {:>10} ({:.1}%)",
            class.code(),
            class.name(),
            n,
            if total == 0 { 0.0 } else { 100.0 * n as f64 / total as f64 }
        );
    }
}
