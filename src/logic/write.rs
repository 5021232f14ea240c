use crate::logic::dataset::SECONDARY_CAPTURE_SOP_CLASS_UID;
use crate::utils::uid::InstanceUids;
use anyhow::{Context, Result};
use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_transfer_syntax_registry::entries::EXPLICIT_VR_LITTLE_ENDIAN;
use std::fs;
use std::path::Path;

/// Write `dataset` as a DICOM Part 10 file in Explicit VR Little Endian.
///
/// The file meta group is built from scratch, so the output is always a
/// conformant file with preamble and `DICM` prefix.
pub fn write_dicom(dataset: InMemDicomObject, uids: &InstanceUids, output_path: &Path) -> Result<()> {
    let transfer_syntax = &EXPLICIT_VR_LITTLE_ENDIAN;

    let file_obj = dataset
        .with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(transfer_syntax.uid())
                .media_storage_sop_class_uid(SECONDARY_CAPTURE_SOP_CLASS_UID)
                .media_storage_sop_instance_uid(uids.sop_instance.as_str()),
        )
        .context("Failed to build DICOM file meta information")?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create output folder {}", parent.display()))?;
    }

    file_obj
        .write_to_file(output_path)
        .with_context(|| format!("Failed to write DICOM file {}", output_path.display()))?;

    tracing::info!(
        path = %output_path.display(),
        transfer_syntax = transfer_syntax.name(),
        "DICOM file written"
    );
    Ok(())
}
