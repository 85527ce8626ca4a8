use redtide::readers::{DataReader, create_reader};
use redtide::utils::log_raster_statistics;
use redtide::writers::write_classification;
use redtide::{BandId, BandSet, ClassifierParams, HabClassifier, RegionOfInterest};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Classifies one scene laid out as `<dir>/<band-name>.tif`, e.g. `red.tif`,
/// `flh-3.tif`, `bbp-morel-input.tif`, and writes `<dir>/hab_class.tif`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "./data/scene".to_string()));

    let mut bands = BTreeMap::new();
    for id in BandId::REQUIRED {
        let reader = create_reader(dir.join(format!("{}.tif", id)), 0)?;
        let raster = reader.read_data()?;
        log_raster_statistics(id.as_str(), &raster);
        bands.insert(id, raster);
    }
    let bands = BandSet::new(bands)?;

    let params = ClassifierParams {
        ergb_stretch_max: Some(20.0),
        ..ClassifierParams::default()
    };
    let output = HabClassifier::new(params).classify(&bands, &RegionOfInterest::Full)?;

    log_raster_statistics("chlorophyll", &output.products.chlorophyll);
    log_raster_statistics("FLH", &output.products.flh);
    log_raster_statistics("bbp ratio", &output.products.bbp_ratio);

    let out = dir.join("hab_class.tif");
    write_classification(&out, &output.result)?;
    println!("Wrote {}", out.display());

    Ok(())
}
