use crate::logic::dataset::{build_dataset, PixelGeometry};
use crate::logic::decode::{decode_image, ColorMode};
use crate::logic::write::write_dicom;
use crate::models::patient::{load_patient_metadata, DEFAULT_PATIENT_FILE};
use crate::models::CaptureSummary;
use crate::utils::uid::InstanceUids;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub struct ConversionOptions {
    pub patient_path: PathBuf,
    pub color_mode: ColorMode,
    pub strict: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            patient_path: PathBuf::from(DEFAULT_PATIENT_FILE),
            color_mode: ColorMode::default(),
            strict: false,
        }
    }
}

/// Convert one raster image into a Secondary Capture DICOM file.
///
/// The sidecar is read first, so a missing sidecar fails before the image
/// is touched and no output file is created.
pub fn convert_image_to_dicom(
    input_path: &Path,
    output_path: &Path,
    options: &ConversionOptions,
) -> Result<CaptureSummary> {
    let patient = load_patient_metadata(&options.patient_path)?;
    if options.strict {
        patient.validate()?;
    }

    let pixels = decode_image(input_path, options.color_mode)?;
    let geometry = PixelGeometry::from_shape(pixels.shape())?;

    let uids = InstanceUids::generate();
    let dataset = build_dataset(&pixels, &patient, &uids)?;
    write_dicom(dataset, &uids, output_path)?;

    Ok(CaptureSummary {
        output_path: output_path.to_path_buf(),
        rows: geometry.rows,
        columns: geometry.columns,
        samples_per_pixel: geometry.samples_per_pixel(),
        photometric_interpretation: geometry.photometric.as_str(),
        sop_instance_uid: uids.sop_instance,
    })
}
