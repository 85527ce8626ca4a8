use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use redtide::{BandId, BandSet, ClassifierParams, GeoTransform, HabClassifier, Raster, RegionOfInterest};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

const ROWS: usize = 60;
const COLS: usize = 80;

/// Offshore gradient with a dark, fluorescent patch standing in for a bloom.
fn synthetic_bands(rng: &mut StdRng) -> BTreeMap<BandId, Raster> {
    let gt = GeoTransform::new(-83.5, 27.5, 0.01, -0.01);
    let mut layers: BTreeMap<BandId, Vec<f64>> = BandId::REQUIRED.iter().map(|&id| (id, Vec::new())).collect();

    for row in 0..ROWS {
        for col in 0..COLS {
            let nearshore = 1.0 - col as f64 / COLS as f64;
            let in_bloom = (20..35).contains(&row) && (30..50).contains(&col);
            let land = col < 3;
            let noise = rng.gen_range(-0.3..0.3);

            let (red, green, peak, chl, bbp) = if in_bloom {
                (3.0 + noise, 3.5 + noise, 0.25, 8.0, 0.01)
            } else {
                (6.0 + 10.0 * nearshore + noise, 6.5 + 9.0 * nearshore + noise, 0.02 * nearshore, 0.4 + 3.0 * nearshore, 0.04)
            };

            let mut push = |id: BandId, v: f64| {
                if let Some(layer) = layers.get_mut(&id) {
                    layer.push(if land { f64::NAN } else { v });
                }
            };
            push(BandId::Red, red);
            push(BandId::Green, green);
            push(BandId::ChlPrimary, 0.004 + 0.006 * (1.0 - nearshore));
            push(BandId::ChlSecondary, 0.006);
            push(BandId::Flh1, 0.1);
            push(BandId::Flh2, 0.1);
            push(BandId::Flh3, 0.1 + peak);
            push(BandId::BbpQaa, bbp);
            push(BandId::BbpMorelInput, chl);
        }
    }

    layers
        .into_iter()
        .map(|(id, values)| {
            let raster = Raster::from_vec(values, ROWS, COLS).expect("synthetic band size").with_transform(gt);
            (id, raster)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut rng = StdRng::seed_from_u64(2014);
    let bands = BandSet::new(synthetic_bands(&mut rng))?;

    let output = HabClassifier::new(ClassifierParams::default()).classify(&bands, &RegionOfInterest::Full)?;

    println!("Thresholds: {}", output.thresholds);
    for (class, count) in output.result.class_counts() {
        println!("  {:>2} {:<32} {}", class.code(), class.name(), count);
    }

    // coarse character map of the result
    for row in (0..ROWS).step_by(4) {
        let line: String = (0..COLS)
            .step_by(2)
            .map(|col| match output.result.codes()[(row, col)] {
                0 => ' ',
                code => char::from(b'0' + code),
            })
            .collect();
        println!("{}", line);
    }

    Ok(())
}
