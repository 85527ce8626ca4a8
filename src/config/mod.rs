use chrono::NaiveDate;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::bands::BandId;
use crate::bbox::Bbox;

pub mod error;
pub use error::ConfigError;

pub mod params;
pub use params::ClassifierParams;

pub mod time_step;
pub use time_step::TimeStep;

/// How a date is spelled inside a band filename.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "YYYYMMDD")]
    Compact,
    #[serde(rename = "YYYY-MM-DD")]
    Dashed,
    #[serde(rename = "YYYY_MM_DD")]
    Underscored,
    /// Year and day of year, as in MODIS granule names (A2014213)
    #[serde(rename = "YYYYDDD")]
    DayOfYear,
}

impl DateFormat {
    pub fn format(&self, date: &NaiveDate) -> String {
        match self {
            DateFormat::Compact => date.format("%Y%m%d").to_string(),
            DateFormat::Dashed => date.format("%Y-%m-%d").to_string(),
            DateFormat::Underscored => date.format("%Y_%m_%d").to_string(),
            DateFormat::DayOfYear => date.format("%Y%j").to_string(),
        }
    }
}

/// Where to find one band for any date of the series.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BandTemplate {
    pub name: BandId,
    pub base_directory: PathBuf,
    /// File name with `{}` standing for the formatted date
    pub filename_pattern: String,
    #[serde(default)]
    pub date_format: DateFormat,
    /// Sample (channel) to read from multi-sample files, e.g. 0/1/2 of an ERGB composite
    #[serde(default)]
    pub channel: usize,
}

impl BandTemplate {
    pub fn file_name_for(&self, date: &NaiveDate) -> String {
        self.filename_pattern
            .replace("{}", &self.date_format.format(date))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    start_date: NaiveDate,
    end_date: NaiveDate,
    frequency: TimeStep,
    bbox: Option<Bbox>,
    output_directory: PathBuf,
    write_diagnostics: bool,
    bands: Vec<BandTemplate>,
    classifier: ClassifierParams,
}

// Deserializes a Config, checking that the dates are in order, the bbox is
// valid, every required band has exactly one template and the classifier
// parameters are in range.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            start_date: String,
            end_date: String,
            #[serde(default)]
            frequency: TimeStep,
            bbox: Option<BboxHelper>,
            #[serde(default = "default_output_directory")]
            output_directory: PathBuf,
            #[serde(default)]
            write_diagnostics: bool,
            bands: Vec<BandTemplate>,
            #[serde(default)]
            classifier: ClassifierParams,
        }

        #[derive(Deserialize)]
        struct BboxHelper {
            xmin: f64,
            xmax: f64,
            ymin: f64,
            ymax: f64,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let start_date = NaiveDate::parse_from_str(&helper.start_date, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("Invalid start_date format: {}", e)))?;

        let end_date = NaiveDate::parse_from_str(&helper.end_date, "%Y-%m-%d")
            .map_err(|e| D::Error::custom(format!("Invalid end_date format: {}", e)))?;

        if start_date > end_date {
            return Err(D::Error::custom(ConfigError::DateOrder));
        }

        let bbox = if let Some(b) = helper.bbox {
            Some(
                Bbox::new(b.xmin, b.xmax, b.ymin, b.ymax)
                    .map_err(|e| D::Error::custom(format!("Invalid bbox: {}", e)))?,
            )
        } else {
            None
        };

        validate_band_templates(&helper.bands)
            .map_err(|e| D::Error::custom(ConfigError::Invalid(e)))?;

        helper
            .classifier
            .validate()
            .map_err(|e| D::Error::custom(ConfigError::Invalid(e)))?;

        Ok(Config {
            start_date,
            end_date,
            frequency: helper.frequency,
            bbox,
            output_directory: helper.output_directory,
            write_diagnostics: helper.write_diagnostics,
            bands: helper.bands,
            classifier: helper.classifier,
        })
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./output")
}

fn validate_band_templates(templates: &[BandTemplate]) -> Result<(), String> {
    let mut seen = BTreeSet::new();
    for template in templates {
        if !seen.insert(template.name) {
            return Err(format!("band '{}' is configured more than once", template.name));
        }
        if !template.filename_pattern.contains("{}") {
            return Err(format!(
                "filename_pattern of band '{}' has no {{}} date placeholder",
                template.name
            ));
        }
    }

    let missing: Vec<&str> = BandId::REQUIRED
        .iter()
        .filter(|id| !seen.contains(*id))
        .map(|id| id.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing band templates: {}", missing.join(", ")));
    }

    Ok(())
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn frequency(&self) -> TimeStep {
        self.frequency
    }

    pub fn bbox(&self) -> Option<&Bbox> {
        self.bbox.as_ref()
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn write_diagnostics(&self) -> bool {
        self.write_diagnostics
    }

    pub fn bands(&self) -> &[BandTemplate] {
        &self.bands
    }

    pub fn classifier(&self) -> &ClassifierParams {
        &self.classifier
    }

    /// Dates from `start_date` to `end_date` inclusive, `frequency` apart.
    pub fn dates(&self) -> DateSeries {
        DateSeries {
            next: Some(self.start_date),
            end: self.end_date,
            step: self.frequency,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateSeries {
    next: Option<NaiveDate>,
    end: NaiveDate,
    step: TimeStep,
}

impl Iterator for DateSeries {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = self.step.advance(current);
        Some(current)
    }
}
