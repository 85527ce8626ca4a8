use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::bands::{BandId, BandSet};
use crate::config::{BandTemplate, Config};
use crate::error::{Error, Result};
use crate::pipeline::{ClassificationOutput, HabClassifier};
use crate::readers::create_reader;
use crate::scene::{RegionOfInterest, SceneThresholds};
use crate::writers;

/// Outcome of one classified date
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub date: NaiveDate,
    pub output: PathBuf,
    pub thresholds: SceneThresholds,
    pub classified_pixels: usize,
    pub class_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedScene {
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub processed: Vec<SceneSummary>,
    pub skipped: Vec<SkippedScene>,
}

#[derive(Debug)]
pub struct BatchRunner {
    config: Config,
    classifier: HabClassifier,
}

impl BatchRunner {
    pub fn new(config: Config) -> Self {
        let classifier = HabClassifier::new(config.classifier().clone());
        BatchRunner { config, classifier }
    }

    fn region(&self) -> RegionOfInterest {
        match self.config.bbox() {
            Some(bbox) => RegionOfInterest::Bbox(*bbox),
            None => RegionOfInterest::Full,
        }
    }

    /// Band files for `date`, or the bands that could not be found
    pub fn scene_files(&self, date: &NaiveDate) -> std::result::Result<BTreeMap<BandId, PathBuf>, Vec<BandId>> {
        let mut files = BTreeMap::new();
        let mut missing = Vec::new();

        for template in self.config.bands() {
            match Self::find_matching_file(template, date) {
                Some(path) => {
                    files.insert(template.name, path);
                }
                None => missing.push(template.name),
            }
        }

        if missing.is_empty() { Ok(files) } else { Err(missing) }
    }

    /// Find the file matching the template for `target_date`, first directly
    /// under the base directory, then anywhere below it.
    fn find_matching_file(template: &BandTemplate, target_date: &NaiveDate) -> Option<PathBuf> {
        let expected_filename = template.file_name_for(target_date);

        let direct_path = template.base_directory.join(&expected_filename);
        if direct_path.is_file() {
            return Some(direct_path);
        }

        Self::search_file_recursively(&template.base_directory, &expected_filename)
    }

    fn search_file_recursively(base_dir: &Path, filename: &str) -> Option<PathBuf> {
        if !base_dir.exists() {
            return None;
        }

        for entry in WalkDir::new(base_dir).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file()
                && let Some(file_name) = entry.path().file_name()
                && file_name.to_string_lossy() == filename
            {
                return Some(entry.into_path());
            }
        }

        None
    }

    fn load_scene(&self, files: &BTreeMap<BandId, PathBuf>) -> Result<BandSet> {
        let mut bands = BTreeMap::new();
        for template in self.config.bands() {
            let Some(path) = files.get(&template.name) else {
                return Err(Error::MissingBand(template.name));
            };
            let reader = create_reader(path.clone(), template.channel).map_err(crate::readers::ReadError::from)?;
            bands.insert(template.name, reader.read_data()?);
        }
        BandSet::new(bands)
    }

    fn write_outputs(&self, date: &NaiveDate, output: &ClassificationOutput) -> Result<PathBuf> {
        let output_dir = self.config.output_directory();
        let date_str = date.format("%Y%m%d").to_string();

        let class_path = output_dir.join(format!("hab_class_{}.tif", date_str));
        writers::write_classification(&class_path, &output.result)?;

        if self.config.write_diagnostics() {
            let products = &output.products;
            for (name, raster) in [
                ("chl", &products.chlorophyll),
                ("flh", &products.flh),
                ("bbp_ratio", &products.bbp_ratio),
                ("chl_error", &products.chl_error),
            ] {
                writers::write_raster(output_dir.join(format!("{}_{}.tif", name, date_str)), raster)?;
            }
        }

        Ok(class_path)
    }

    fn process_date(&self, date: &NaiveDate, files: &BTreeMap<BandId, PathBuf>) -> Result<SceneSummary> {
        let bands = self.load_scene(files)?;
        let output = self.classifier.classify(&bands, &self.region())?;
        let path = self.write_outputs(date, &output)?;

        let class_counts = output
            .result
            .class_counts()
            .into_iter()
            .map(|(class, n)| (class.name().to_string(), n))
            .collect();

        Ok(SceneSummary {
            date: *date,
            output: path,
            thresholds: output.thresholds,
            classified_pixels: output.result.classified_count(),
            class_counts,
        })
    }

    /// Classifies every date of the series. Dates with missing band files or
    /// a failed classification are logged and skipped; a `summary.json` of
    /// the run is written next to the outputs.
    pub fn process(&self) -> Result<BatchReport> {
        let output_dir = self.config.output_directory();
        fs::create_dir_all(output_dir)?;

        let dates: Vec<NaiveDate> = self.config.dates().collect();
        info!(
            "Requested {} date periods ({} to {}, {})",
            dates.len(),
            self.config.start_date(),
            self.config.end_date(),
            self.config.frequency()
        );

        let mut report = BatchReport::default();

        for date in &dates {
            let files = match self.scene_files(date) {
                Ok(files) => files,
                Err(missing) => {
                    let names: Vec<&str> = missing.iter().map(|b| b.as_str()).collect();
                    warn!("✗ Missing raster files for date {}: {:?}", date, names);
                    report.skipped.push(SkippedScene {
                        date: *date,
                        reason: format!("missing bands: {}", names.join(", ")),
                    });
                    continue;
                }
            };
            info!("✓ Found all {} raster files for date {}", files.len(), date);

            match self.process_date(date, &files) {
                Ok(summary) => {
                    info!("✓ Saved classification for {} to: {}", date, summary.output.display());
                    report.processed.push(summary);
                }
                Err(e) => {
                    warn!("✗ Failed to classify {}: {}", date, e);
                    report.skipped.push(SkippedScene {
                        date: *date,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let summary_path = output_dir.join("summary.json");
        let writer = BufWriter::new(File::create(&summary_path)?);
        serde_json::to_writer_pretty(writer, &report).map_err(|e| Error::Write(e.to_string()))?;

        info!(
            "Processed {} of {} requested dates, summary in {}",
            report.processed.len(),
            dates.len(),
            summary_path.display()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::WaterClass;
    use crate::raster::{GeoTransform, Raster};
    use crate::readers::{DataReader, GeoTiffReader};
    use serde_json::json;
    use tempfile::tempdir;

    fn band_values(id: BandId) -> Vec<f64> {
        match id {
            BandId::Red | BandId::Green => vec![1.0, 5.0, 5.0, 5.0],
            BandId::ChlPrimary => vec![0.012; 4],
            BandId::ChlSecondary => vec![0.010; 4],
            BandId::Flh3 => vec![0.1, 0.0, 0.0, 0.0],
            BandId::Flh1 | BandId::Flh2 => vec![0.0; 4],
            BandId::BbpQaa => vec![0.002; 4],
            BandId::BbpMorelInput => vec![10.0; 4],
            BandId::Blue => vec![0.0; 4],
        }
    }

    /// Writes one date of band files, flh bands one directory down.
    fn write_scene(base: &Path, date: &str) {
        let gt = GeoTransform::new(-84.0, 28.0, 0.5, -0.5);
        let nested = base.join("flh");
        fs::create_dir_all(&nested).unwrap();

        for id in BandId::REQUIRED {
            let dir = if id.as_str().starts_with("flh") { &nested } else { base };
            let raster = Raster::from_vec(band_values(id), 2, 2).unwrap().with_transform(gt);
            writers::write_raster(dir.join(format!("A{}_{}.tif", date, id)), &raster).unwrap();
        }
    }

    fn config(base: &Path, out: &Path, diagnostics: bool) -> Config {
        let bands: Vec<_> = BandId::REQUIRED
            .iter()
            .map(|id| {
                json!({
                    "name": id.as_str(),
                    "base_directory": base,
                    "filename_pattern": format!("A{{}}_{}.tif", id),
                })
            })
            .collect();

        serde_json::from_value(json!({
            "start_date": "2014-08-01",
            "end_date": "2014-08-02",
            "frequency": "daily",
            "output_directory": out,
            "write_diagnostics": diagnostics,
            "bands": bands,
        }))
        .unwrap()
    }

    #[test]
    fn test_skips_dates_with_missing_files() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_scene(data.path(), "20140801");

        let report = BatchRunner::new(config(data.path(), out.path(), false))
            .process()
            .unwrap();

        assert_eq!(report.processed.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].date, NaiveDate::from_ymd_opt(2014, 8, 2).unwrap());
        assert!(report.skipped[0].reason.contains("red"));

        let class_path = out.path().join("hab_class_20140801.tif");
        assert_eq!(report.processed[0].output, class_path);
        assert!(out.path().join("summary.json").is_file());
        assert!(!out.path().join("flh_20140801.tif").exists());

        let classes = GeoTiffReader {
            path: class_path,
            channel: 0,
        }
        .read_data()
        .unwrap();
        assert_eq!(classes.rows(), 2);
        let codes: Vec<f64> = classes.data().iter().copied().collect();
        let hab = WaterClass::HabRich.code() as f64;
        let clear = WaterClass::ShallowClear.code() as f64;
        assert_eq!(codes, vec![hab, clear, clear, clear]);

        // red and green 25th percentile of [1, 5, 5, 5]
        let summary = &report.processed[0];
        assert_eq!(summary.thresholds.red, 4.0);
        assert_eq!(summary.thresholds.green, 4.0);
        assert_eq!(summary.classified_pixels, 4);
        assert_eq!(summary.class_counts.get(WaterClass::HabRich.name()), Some(&1));
        assert_eq!(summary.class_counts.get(WaterClass::ShallowClear.name()), Some(&3));
        assert!(!summary.class_counts.contains_key(WaterClass::SedimentRich.name()));
    }

    #[test]
    fn test_writes_diagnostics_when_enabled() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_scene(data.path(), "20140801");

        BatchRunner::new(config(data.path(), out.path(), true))
            .process()
            .unwrap();

        for name in ["chl", "flh", "bbp_ratio", "chl_error"] {
            assert!(out.path().join(format!("{}_20140801.tif", name)).is_file());
        }
    }

    #[test]
    fn test_finds_files_recursively() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_scene(data.path(), "20140801");

        let runner = BatchRunner::new(config(data.path(), out.path(), false));
        let files = runner
            .scene_files(&NaiveDate::from_ymd_opt(2014, 8, 1).unwrap())
            .unwrap();

        assert_eq!(files.len(), BandId::REQUIRED.len());
        assert!(files[&BandId::Flh2].starts_with(data.path().join("flh")));

        let missing = runner
            .scene_files(&NaiveDate::from_ymd_opt(2014, 8, 2).unwrap())
            .unwrap_err();
        assert_eq!(missing.len(), BandId::REQUIRED.len());
    }
}
