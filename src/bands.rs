use crate::error::{Error, Result};
use crate::raster::{Grid, Mask, Raster, ensure_aligned};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Logical input bands of a classification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum BandId {
    /// Enhanced-RGB red channel (nLw 547 nm on MODIS)
    #[serde(rename = "red")]
    Red,
    /// Enhanced-RGB green channel (nLw 488 nm on MODIS)
    #[serde(rename = "green")]
    Green,
    /// Enhanced-RGB blue channel, display only
    #[serde(rename = "blue")]
    Blue,
    /// Blue reflectance entering the OC3 band ratio
    #[serde(rename = "chl-primary")]
    ChlPrimary,
    /// Green reflectance entering the OC3 band ratio
    #[serde(rename = "chl-secondary")]
    ChlSecondary,
    #[serde(rename = "flh-1")]
    Flh1,
    #[serde(rename = "flh-2")]
    Flh2,
    #[serde(rename = "flh-3")]
    Flh3,
    /// Particulate backscattering from QAA
    #[serde(rename = "bbp-qaa")]
    BbpQaa,
    /// Chlorophyll used by the Morel backscattering model
    #[serde(rename = "bbp-morel-input")]
    BbpMorelInput,
}

impl BandId {
    /// Bands without which a scene cannot be classified.
    pub const REQUIRED: [BandId; 9] = [
        BandId::Red,
        BandId::Green,
        BandId::ChlPrimary,
        BandId::ChlSecondary,
        BandId::Flh1,
        BandId::Flh2,
        BandId::Flh3,
        BandId::BbpQaa,
        BandId::BbpMorelInput,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BandId::Red => "red",
            BandId::Green => "green",
            BandId::Blue => "blue",
            BandId::ChlPrimary => "chl-primary",
            BandId::ChlSecondary => "chl-secondary",
            BandId::Flh1 => "flh-1",
            BandId::Flh2 => "flh-2",
            BandId::Flh3 => "flh-3",
            BandId::BbpQaa => "bbp-qaa",
            BandId::BbpMorelInput => "bbp-morel-input",
        }
    }
}

impl Display for BandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named, co-registered input rasters for one scene.
///
/// Construction through [`BandSet::new`] guarantees every required band is
/// present and all bands share one grid.
#[derive(Debug, Clone)]
pub struct BandSet {
    bands: BTreeMap<BandId, Raster>,
}

impl BandSet {
    pub fn new(bands: BTreeMap<BandId, Raster>) -> Result<Self> {
        for id in BandId::REQUIRED {
            if !bands.contains_key(&id) {
                return Err(Error::MissingBand(id));
            }
        }

        let mut iter = bands.values();
        if let Some(reference) = iter.next() {
            for raster in iter {
                ensure_aligned(reference, raster)?;
            }
        }

        Ok(Self { bands })
    }

    pub fn band(&self, id: BandId) -> Result<&Raster> {
        self.bands.get(&id).ok_or(Error::MissingBand(id))
    }

    /// Grid dimensions shared by all bands
    pub fn shape(&self) -> (usize, usize) {
        self.reference().shape()
    }

    /// Any band; all of them share the same grid.
    pub fn reference(&self) -> &Raster {
        // REQUIRED is non-empty and checked in `new`
        &self.bands[&BandId::Red]
    }

    pub fn ids(&self) -> impl Iterator<Item = BandId> + '_ {
        self.bands.keys().copied()
    }

    /// Cells where every required band holds data
    pub fn valid_mask(&self) -> Result<Mask> {
        let mut valid = self.reference().valid();
        for id in BandId::REQUIRED {
            valid = valid.and(&self.band(id)?.valid())?;
        }
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_set(rows: usize, cols: usize) -> BTreeMap<BandId, Raster> {
        BandId::REQUIRED
            .iter()
            .map(|&id| (id, Raster::filled(rows, cols, 1.0)))
            .collect()
    }

    #[test]
    fn test_missing_band_is_reported() {
        let mut bands = full_set(2, 2);
        bands.remove(&BandId::Flh2);

        match BandSet::new(bands) {
            Err(Error::MissingBand(id)) => assert_eq!(id, BandId::Flh2),
            other => panic!("expected missing band, got {:?}", other),
        }
    }

    #[test]
    fn test_misaligned_band_is_reported() {
        let mut bands = full_set(2, 2);
        bands.insert(BandId::Blue, Raster::filled(3, 2, 1.0));

        assert!(matches!(
            BandSet::new(bands),
            Err(Error::Misaligned { .. })
        ));
    }

    #[test]
    fn test_valid_mask_requires_every_required_band() {
        let mut bands = full_set(1, 3);
        bands.insert(BandId::BbpQaa, Raster::from_vec(vec![1.0, f64::NAN, 1.0], 1, 3).unwrap());
        bands.insert(BandId::ChlPrimary, Raster::from_vec(vec![1.0, 1.0, f64::NAN], 1, 3).unwrap());
        // blue is optional and never invalidates a pixel
        bands.insert(BandId::Blue, Raster::nodata(1, 3));

        let valid = BandSet::new(bands).unwrap().valid_mask().unwrap();
        assert_eq!(valid.get(0, 0), Some(true));
        assert_eq!(valid.get(0, 1), Some(false));
        assert_eq!(valid.get(0, 2), Some(false));
    }

    #[test]
    fn test_optional_blue_band() {
        let set = BandSet::new(full_set(2, 3)).unwrap();
        assert_eq!(set.shape(), (2, 3));
        assert!(set.band(BandId::Blue).is_err());
        assert_eq!(set.ids().count(), 9);
    }

    #[test]
    fn test_band_names_deserialize() {
        let id: BandId = serde_json::from_str("\"bbp-morel-input\"").unwrap();
        assert_eq!(id, BandId::BbpMorelInput);
        assert_eq!(BandId::ChlPrimary.to_string(), "chl-primary");
    }
}
