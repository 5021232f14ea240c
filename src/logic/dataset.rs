use crate::models::patient::PatientMetadata;
use crate::utils::uid::InstanceUids;
use anyhow::{bail, Result};
use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::dictionary_std::tags;
use dicom_object::InMemDicomObject;
use ndarray::ArrayD;

/// Secondary Capture Image Storage
pub const SECONDARY_CAPTURE_SOP_CLASS_UID: &str = "1.2.840.10008.5.1.4.1.1.7";
pub const MODALITY_SECONDARY_CAPTURE: &str = "SC";

const BITS_ALLOCATED: u16 = 8;
const BITS_STORED: u16 = 8;
const HIGH_BIT: u16 = 7;
const PIXEL_REPRESENTATION_UNSIGNED: u16 = 0;
const PLANAR_CONFIGURATION_INTERLEAVED: u16 = 0;
const WINDOW_CENTER: &str = "128";
const WINDOW_WIDTH: &str = "256";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Photometric {
    Monochrome2,
    Rgb,
}

impl Photometric {
    pub fn as_str(self) -> &'static str {
        match self {
            Photometric::Monochrome2 => "MONOCHROME2",
            Photometric::Rgb => "RGB",
        }
    }

    pub fn samples_per_pixel(self) -> u16 {
        match self {
            Photometric::Monochrome2 => 1,
            Photometric::Rgb => 3,
        }
    }
}

/// Image geometry as recorded in the Image Pixel module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelGeometry {
    pub rows: u16,
    pub columns: u16,
    pub photometric: Photometric,
}

impl PixelGeometry {
    /// Derive geometry from a pixel array shape.
    ///
    /// `[rows, columns]` is MONOCHROME2, `[rows, columns, 3]` is RGB.
    /// Anything else is rejected.
    pub fn from_shape(shape: &[usize]) -> Result<Self> {
        let (rows, columns, photometric) = match *shape {
            [rows, columns] => (rows, columns, Photometric::Monochrome2),
            [rows, columns, 3] => (rows, columns, Photometric::Rgb),
            [_, _, channels] => {
                bail!("expected 3 colour channels, got {channels} (shape {shape:?})")
            }
            _ => bail!("unsupported pixel array shape {shape:?}"),
        };

        let Ok(rows) = u16::try_from(rows) else {
            bail!("image has {rows} rows, more than DICOM allows ({})", u16::MAX);
        };
        let Ok(columns) = u16::try_from(columns) else {
            bail!("image has {columns} columns, more than DICOM allows ({})", u16::MAX);
        };

        Ok(Self {
            rows,
            columns,
            photometric,
        })
    }

    pub fn samples_per_pixel(&self) -> u16 {
        self.photometric.samples_per_pixel()
    }
}

/// Assemble the Secondary Capture dataset for one image.
pub fn build_dataset(
    pixels: &ArrayD<u8>,
    patient: &PatientMetadata,
    uids: &InstanceUids,
) -> Result<InMemDicomObject> {
    let geometry = PixelGeometry::from_shape(pixels.shape())?;
    let mut obj = InMemDicomObject::new_empty();

    // SOP Common, General Study, General Series
    put_str(&mut obj, tags::SOP_CLASS_UID, VR::UI, SECONDARY_CAPTURE_SOP_CLASS_UID);
    put_str(&mut obj, tags::SOP_INSTANCE_UID, VR::UI, &uids.sop_instance);
    put_str(&mut obj, tags::STUDY_INSTANCE_UID, VR::UI, &uids.study_instance);
    put_str(&mut obj, tags::SERIES_INSTANCE_UID, VR::UI, &uids.series_instance);
    put_str(&mut obj, tags::MODALITY, VR::CS, MODALITY_SECONDARY_CAPTURE);

    // Patient and study attributes from the sidecar
    let patient_fields = [
        (tags::PATIENT_NAME, VR::PN, &patient.patient_name),
        (tags::PATIENT_ID, VR::LO, &patient.patient_id),
        (tags::PATIENT_BIRTH_DATE, VR::DA, &patient.patient_birth_date),
        (tags::PATIENT_SEX, VR::CS, &patient.patient_sex),
        (tags::STUDY_DATE, VR::DA, &patient.study_date),
        (tags::STUDY_TIME, VR::TM, &patient.study_time),
        (tags::STUDY_ID, VR::SH, &patient.study_id),
        (tags::ACCESSION_NUMBER, VR::SH, &patient.accession_number),
        (tags::STUDY_DESCRIPTION, VR::LO, &patient.study_description),
        (tags::SERIES_DESCRIPTION, VR::LO, &patient.series_description),
        (
            tags::REFERRING_PHYSICIAN_NAME,
            VR::PN,
            &patient.referring_physician_name,
        ),
    ];
    for (tag, vr, value) in patient_fields {
        put_str(&mut obj, tag, vr, value);
    }

    // Image Pixel
    put_u16(&mut obj, tags::ROWS, geometry.rows);
    put_u16(&mut obj, tags::COLUMNS, geometry.columns);
    put_u16(&mut obj, tags::SAMPLES_PER_PIXEL, geometry.samples_per_pixel());
    put_str(
        &mut obj,
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        geometry.photometric.as_str(),
    );
    put_u16(&mut obj, tags::BITS_ALLOCATED, BITS_ALLOCATED);
    put_u16(&mut obj, tags::BITS_STORED, BITS_STORED);
    put_u16(&mut obj, tags::HIGH_BIT, HIGH_BIT);
    put_u16(
        &mut obj,
        tags::PIXEL_REPRESENTATION,
        PIXEL_REPRESENTATION_UNSIGNED,
    );

    match geometry.photometric {
        Photometric::Monochrome2 => {
            put_str(&mut obj, tags::WINDOW_CENTER, VR::DS, WINDOW_CENTER);
            put_str(&mut obj, tags::WINDOW_WIDTH, VR::DS, WINDOW_WIDTH);
        }
        Photometric::Rgb => {
            put_u16(
                &mut obj,
                tags::PLANAR_CONFIGURATION,
                PLANAR_CONFIGURATION_INTERLEAVED,
            );
        }
    }

    // logical iteration order is row-major whatever the memory layout
    let pixel_bytes: Vec<u8> = pixels.iter().copied().collect();
    obj.put_element(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(pixel_bytes),
    ));

    tracing::debug!(
        rows = geometry.rows,
        columns = geometry.columns,
        photometric = geometry.photometric.as_str(),
        sop_instance_uid = %uids.sop_instance,
        "dataset assembled"
    );

    Ok(obj)
}

fn put_str(obj: &mut InMemDicomObject, tag: Tag, vr: VR, value: &str) {
    obj.put_element(DataElement::new(tag, vr, PrimitiveValue::from(value)));
}

fn put_u16(obj: &mut InMemDicomObject, tag: Tag, value: u16) {
    obj.put_element(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
}
