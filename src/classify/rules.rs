//! Per-pixel decision rules
//!
//! Water is first split by ERGB brightness (both red and green above, or both
//! below, their scene percentile) and by fluorescence (FLH above or below its
//! scene percentile). Dark, fluorescent water is phytoplankton-rich and is
//! split again by the backscattering ratio: blooms of *Karenia brevis*
//! backscatter less than the Morel model predicts.
//!
//! Every comparison is strict, so a pixel sitting exactly on a threshold, or
//! holding no-data in any input, matches no class.

use crate::scene::SceneThresholds;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum WaterClass {
    Unclassified = 0,
    /// Bright water with high fluorescence
    SedimentRich = 1,
    /// Bright water with low fluorescence
    ShallowClear = 2,
    /// Dark water with low fluorescence
    CdomRich = 3,
    /// Phytoplankton-rich water whose backscattering ratio is above the bloom
    /// threshold, i.e. non-bloom phytoplankton.
    ///
    /// Whether this class should cover all non-bloom phytoplankton-rich water
    /// or become a separate category is an open question; the five-code
    /// output keeps it at 4.
    HabPoor = 4,
    /// Phytoplankton-rich water with a low backscattering ratio (bloom)
    HabRich = 5,
}

impl WaterClass {
    /// Classes in encoder order; the encoder weight of each is its code.
    pub const CLASSES: [WaterClass; 5] = [
        WaterClass::SedimentRich,
        WaterClass::ShallowClear,
        WaterClass::CdomRich,
        WaterClass::HabPoor,
        WaterClass::HabRich,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(WaterClass::Unclassified),
            1 => Some(WaterClass::SedimentRich),
            2 => Some(WaterClass::ShallowClear),
            3 => Some(WaterClass::CdomRich),
            4 => Some(WaterClass::HabPoor),
            5 => Some(WaterClass::HabRich),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WaterClass::Unclassified => "unclassified",
            WaterClass::SedimentRich => "sediment-rich",
            WaterClass::ShallowClear => "shallow-clear",
            WaterClass::CdomRich => "CDOM-rich",
            WaterClass::HabPoor => "phytoplankton-rich, non-bloom",
            WaterClass::HabRich => "HAB-rich",
        }
    }
}

impl Display for WaterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Derived values of one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelInputs {
    pub red: f64,
    pub green: f64,
    pub flh: f64,
    pub bbp_ratio: f64,
}

/// Brightness and fluorescence partitions of one pixel.
///
/// `bright`/`dark` and `high_flh`/`low_flh` are never both true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelConditions {
    pub bright: bool,
    pub dark: bool,
    pub high_flh: bool,
    pub low_flh: bool,
}

impl PixelConditions {
    pub fn evaluate(px: &PixelInputs, thresholds: &SceneThresholds) -> Self {
        Self {
            bright: px.red > thresholds.red && px.green > thresholds.green,
            dark: px.red < thresholds.red && px.green < thresholds.green,
            high_flh: px.flh > thresholds.flh,
            low_flh: px.flh < thresholds.flh,
        }
    }

    pub fn phytoplankton_rich(&self) -> bool {
        self.dark && self.high_flh
    }
}

/// Scene thresholds plus the bloom ratio threshold, applied pixel by pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionRules {
    pub thresholds: SceneThresholds,
    pub bbp_ratio_threshold: f64,
}

impl DecisionRules {
    pub fn new(thresholds: SceneThresholds, bbp_ratio_threshold: f64) -> Self {
        Self {
            thresholds,
            bbp_ratio_threshold,
        }
    }

    /// Predicate of a single class; `Unclassified` never matches.
    pub fn matches(&self, class: WaterClass, px: &PixelInputs) -> bool {
        let c = PixelConditions::evaluate(px, &self.thresholds);
        match class {
            WaterClass::Unclassified => false,
            WaterClass::SedimentRich => c.bright && c.high_flh,
            WaterClass::ShallowClear => c.bright && c.low_flh,
            WaterClass::CdomRich => c.dark && c.low_flh,
            WaterClass::HabPoor => c.phytoplankton_rich() && px.bbp_ratio > self.bbp_ratio_threshold,
            WaterClass::HabRich => c.phytoplankton_rich() && px.bbp_ratio < self.bbp_ratio_threshold,
        }
    }

    /// Ordered evaluation of the decision tree.
    pub fn classify(&self, px: &PixelInputs) -> WaterClass {
        let c = PixelConditions::evaluate(px, &self.thresholds);

        if c.bright {
            if c.high_flh {
                return WaterClass::SedimentRich;
            }
            if c.low_flh {
                return WaterClass::ShallowClear;
            }
        } else if c.dark {
            if c.low_flh {
                return WaterClass::CdomRich;
            }
            if c.high_flh {
                if px.bbp_ratio > self.bbp_ratio_threshold {
                    return WaterClass::HabPoor;
                }
                if px.bbp_ratio < self.bbp_ratio_threshold {
                    return WaterClass::HabRich;
                }
            }
        }

        WaterClass::Unclassified
    }
}
