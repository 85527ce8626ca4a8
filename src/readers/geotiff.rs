use super::{DataReader, ReadError};
use crate::raster::{GeoTransform, Raster};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::PathBuf;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::debug;

/// Reads one sample (channel) of a GeoTIFF as an f64 raster.
///
/// Pixels equal to the GDAL no-data value become `NaN`. The geotransform is
/// taken from the ModelPixelScale and ModelTiepoint tags when both are present.
pub struct GeoTiffReader {
    pub path: PathBuf,
    pub channel: usize,
}

impl DataReader for GeoTiffReader {
    fn read_data(&self) -> Result<Raster, ReadError> {
        let file = File::open(&self.path)
            .map_err(|e| ReadError::GeoTiff(format!("Failed to open {}: {}", self.path.display(), e)))?;

        let reader = BufReader::new(file);

        let mut decoder = Decoder::new(reader)
            .map_err(|e| ReadError::GeoTiff(format!("Failed to decode TIFF: {}", e)))?
            .with_limits(Limits::unlimited());

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| ReadError::GeoTiff(format!("Failed to get dimensions: {}", e)))?;

        let nodata = gdal_nodata(&mut decoder)?;
        let transform = geotransform(&mut decoder)?;

        let samples: Vec<f64> = match decoder
            .read_image()
            .map_err(|e| ReadError::GeoTiff(format!("Failed to read image: {}", e)))?
        {
            DecodingResult::U8(data) => data.iter().map(|&x| f64::from(x)).collect(),
            DecodingResult::U16(data) => data.iter().map(|&x| f64::from(x)).collect(),
            DecodingResult::U32(data) => data.iter().map(|&x| f64::from(x)).collect(),
            DecodingResult::I8(data) => data.iter().map(|&x| f64::from(x)).collect(),
            DecodingResult::I16(data) => data.iter().map(|&x| f64::from(x)).collect(),
            DecodingResult::I32(data) => data.iter().map(|&x| f64::from(x)).collect(),
            DecodingResult::F32(data) => data.iter().map(|&x| f64::from(x)).collect(),
            DecodingResult::F64(data) => data,
            _ => return Err(ReadError::GeoTiff("Unsupported pixel format".to_string())),
        };

        let (rows, cols) = (height as usize, width as usize);
        let pixels = rows * cols;
        if pixels == 0 || samples.len() % pixels != 0 {
            return Err(ReadError::GeoTiff(format!(
                "{} samples do not fill a {}x{} image",
                samples.len(),
                rows,
                cols
            )));
        }

        let per_pixel = samples.len() / pixels;
        if self.channel >= per_pixel {
            return Err(ReadError::Channel {
                requested: self.channel,
                available: per_pixel,
            });
        }

        let values: Vec<f64> = samples
            .iter()
            .skip(self.channel)
            .step_by(per_pixel)
            .map(|&v| match nodata {
                Some(nd) if v == nd || (nd.is_nan() && v.is_nan()) => f64::NAN,
                _ => v,
            })
            .collect();

        debug!(
            "Read {} ({}x{}, channel {}/{}, nodata {:?})",
            self.path.display(),
            rows,
            cols,
            self.channel,
            per_pixel,
            nodata
        );

        let raster = Raster::from_vec(values, rows, cols).map_err(|e| ReadError::GeoTiff(e.to_string()))?;
        Ok(match transform {
            Some(gt) => raster.with_transform(gt),
            None => raster,
        })
    }
}

fn gdal_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<f64>, ReadError> {
    let Some(value) = decoder
        .find_tag(Tag::GdalNodata)
        .map_err(|e| ReadError::GeoTiff(format!("Failed to read GDAL_NODATA: {}", e)))?
    else {
        return Ok(None);
    };

    let text = value
        .into_string()
        .map_err(|e| ReadError::GeoTiff(format!("Invalid GDAL_NODATA tag: {}", e)))?;
    let text = text.trim_matches(char::from(0)).trim();

    match text.to_ascii_lowercase().as_str() {
        "nan" => Ok(Some(f64::NAN)),
        _ => text
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ReadError::GeoTiff(format!("Invalid GDAL_NODATA value '{}': {}", text, e))),
    }
}

fn geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<GeoTransform>, ReadError> {
    let mut f64_tag = |tag: Tag, name: &str| -> Result<Option<Vec<f64>>, ReadError> {
        decoder
            .find_tag(tag)
            .and_then(|v| v.map(|v| v.into_f64_vec()).transpose())
            .map_err(|e| ReadError::GeoTiff(format!("Failed to read {}: {}", name, e)))
    };

    let scale = f64_tag(Tag::ModelPixelScaleTag, "ModelPixelScale")?;
    let tiepoint = f64_tag(Tag::ModelTiepointTag, "ModelTiepoint")?;

    Ok(match (scale, tiepoint) {
        (Some(scale), Some(tiepoint)) => GeoTransform::from_geotiff_tags(&scale, &tiepoint),
        _ => None,
    })
}
