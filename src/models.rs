pub mod patient;

use std::path::PathBuf;

/// Outcome of a successful conversion.
#[derive(Debug, Clone)]
pub struct CaptureSummary {
    pub output_path: PathBuf,
    pub rows: u16,
    pub columns: u16,
    pub samples_per_pixel: u16,
    pub photometric_interpretation: &'static str,
    pub sop_instance_uid: String,
}

impl CaptureSummary {
    pub fn describe(&self) -> String {
        format!(
            "Rows: {}, Cols: {}, Samples: {}, Photometric: {}",
            self.rows, self.columns, self.samples_per_pixel, self.photometric_interpretation
        )
    }
}
