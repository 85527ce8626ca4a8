//! GeoTIFF output
//!
//! Class codes are written as 8-bit grey with 0 declared as no-data;
//! diagnostic rasters as 32-bit float grey with `NaN` as no-data. Both carry
//! ModelPixelScale/ModelTiepoint tags when the grid is georeferenced.

use crate::classify::ClassificationResult;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Grid, Raster};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tiff::encoder::{TiffEncoder, colortype};
use tiff::tags::Tag;
use tracing::debug;

/// (ModelPixelScale, ModelTiepoint) for a north-up grid
fn geo_tags(gt: &GeoTransform) -> ([f64; 3], [f64; 6]) {
    (
        [gt.pixel_width, -gt.pixel_height, 0.0],
        [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0],
    )
}

fn dimensions(grid: &impl Grid) -> Result<(u32, u32)> {
    let (rows, cols) = grid.shape();
    match (u32::try_from(cols), u32::try_from(rows)) {
        (Ok(width), Ok(height)) if width > 0 && height > 0 => Ok((width, height)),
        _ => Err(Error::InvalidDimensions { rows, cols }),
    }
}

pub fn write_classification<P: AsRef<Path>>(path: P, result: &ClassificationResult) -> Result<()> {
    let (width, height) = dimensions(result)?;
    let file = BufWriter::new(File::create(path.as_ref())?);
    let mut encoder = TiffEncoder::new(file)?;
    let mut image = encoder.new_image::<colortype::Gray8>(width, height)?;

    if let Some(gt) = result.transform() {
        let (scale, tiepoint) = geo_tags(gt);
        image.encoder().write_tag(Tag::ModelPixelScaleTag, &scale[..])?;
        image.encoder().write_tag(Tag::ModelTiepointTag, &tiepoint[..])?;
    }
    image.encoder().write_tag(Tag::GdalNodata, "0")?;

    let codes: Vec<u8> = result.codes().iter().copied().collect();
    image.write_data(&codes)?;

    debug!("Wrote class codes to {}", path.as_ref().display());
    Ok(())
}

pub fn write_raster<P: AsRef<Path>>(path: P, raster: &Raster) -> Result<()> {
    let (width, height) = dimensions(raster)?;
    let file = BufWriter::new(File::create(path.as_ref())?);
    let mut encoder = TiffEncoder::new(file)?;
    let mut image = encoder.new_image::<colortype::Gray32Float>(width, height)?;

    if let Some(gt) = raster.transform() {
        let (scale, tiepoint) = geo_tags(gt);
        image.encoder().write_tag(Tag::ModelPixelScaleTag, &scale[..])?;
        image.encoder().write_tag(Tag::ModelTiepointTag, &tiepoint[..])?;
    }
    image.encoder().write_tag(Tag::GdalNodata, "nan")?;

    let samples: Vec<f32> = raster.data().iter().map(|&v| v as f32).collect();
    image.write_data(&samples)?;

    debug!("Wrote raster to {}", path.as_ref().display());
    Ok(())
}
