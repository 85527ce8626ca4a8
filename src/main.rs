use redtide::batch::BatchRunner;
use redtide::config::Config;
use redtide::WaterClass;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "./data/config/hab_config.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    info!("Starting HAB classification with config {}", config_path);
    let config = Config::from_file(&config_path)?;

    let report = BatchRunner::new(config).process()?;

    let classified: usize = report.processed.iter().map(|s| s.classified_pixels).sum();
    println!(
        "HAB classification - dates processed: {}, skipped: {}, classified pixels: {}",
        report.processed.len(),
        report.skipped.len(),
        classified
    );

    for scene in &report.processed {
        let hab = scene
            .class_counts
            .get(WaterClass::HabRich.name())
            .copied()
            .unwrap_or(0);
        println!(
            "  {}: {} classified, {} HAB-rich -> {}",
            scene.date,
            scene.classified_pixels,
            hab,
            scene.output.display()
        );
    }
    for skipped in &report.skipped {
        println!("  {}: skipped ({})", skipped.date, skipped.reason);
    }

    Ok(())
}
