//! Harmful algal bloom classification of coastal ocean-colour scenes.
//!
//! Per-pixel band algebra derives OC3 chlorophyll, fluorescence line height
//! and the QAA/Morel backscattering ratio from co-registered input bands.
//! Scene percentiles of ERGB brightness and FLH then drive a threshold
//! classifier whose five mutually exclusive classes are encoded as a single
//! categorical raster (0 = unclassified).
//!
//! ```no_run
//! use redtide::{BandSet, ClassifierParams, HabClassifier, RegionOfInterest};
//! # fn run(bands: BandSet) -> redtide::Result<()> {
//! let output = HabClassifier::new(ClassifierParams::default())
//!     .classify(&bands, &RegionOfInterest::Full)?;
//! println!("{} pixels classified", output.result.classified_count());
//! # Ok(())
//! # }
//! ```

pub mod bands;
pub mod batch;
pub mod bbox;
pub mod classify;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod products;
pub mod raster;
pub mod readers;
pub mod sat_bands;
pub mod scene;
pub mod utils;
pub mod writers;

pub use bands::{BandId, BandSet};
pub use classify::{ClassificationResult, WaterClass};
pub use config::{ClassifierParams, Config};
pub use error::{Error, Result};
pub use pipeline::{ClassificationOutput, HabClassifier};
pub use raster::{GeoTransform, Raster};
pub use scene::{RegionOfInterest, SceneThresholds};
