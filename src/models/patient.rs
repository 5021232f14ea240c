use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default sidecar location, relative to the working directory.
pub const DEFAULT_PATIENT_FILE: &str = "patient.json";

/// VR length limits for identifier fields (PS3.5 Table 6.2-1).
const LO_MAX_LEN: usize = 64;
const SH_MAX_LEN: usize = 16;

/// Patient and study attributes read from the JSON sidecar.
///
/// Every key is required and every value is copied into the dataset as-is.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PatientMetadata {
    pub patient_name: String,
    #[serde(rename = "PatientID")]
    pub patient_id: String,
    pub patient_birth_date: String,
    pub patient_sex: String,
    pub study_date: String,
    pub study_time: String,
    #[serde(rename = "StudyID")]
    pub study_id: String,
    pub accession_number: String,
    pub study_description: String,
    pub series_description: String,
    pub referring_physician_name: String,
}

/// Read the patient sidecar at `path`.
///
/// A missing file is reported on its own, before the contents are looked at.
pub fn load_patient_metadata(path: &Path) -> Result<PatientMetadata> {
    if !path.exists() {
        bail!(
            "patient metadata file `{}` not found; create it or pass --patient <PATH>",
            path.display()
        );
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read patient metadata {}", path.display()))?;
    let metadata: PatientMetadata = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid patient metadata in {}", path.display()))?;

    tracing::debug!(path = %path.display(), patient_id = %metadata.patient_id, "patient metadata loaded");
    Ok(metadata)
}

impl PatientMetadata {
    /// Check values against the DICOM value representations they are written as.
    ///
    /// All problems are reported together.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        for (key, value) in [
            ("PatientBirthDate", &self.patient_birth_date),
            ("StudyDate", &self.study_date),
        ] {
            if !is_dicom_date(value) {
                problems.push(format!("{key} `{value}` is not a YYYYMMDD date"));
            }
        }

        if !is_dicom_time(&self.study_time) {
            problems.push(format!(
                "StudyTime `{}` is not a HHMMSS[.FFFFFF] time",
                self.study_time
            ));
        }

        if !matches!(self.patient_sex.as_str(), "" | "M" | "F" | "O") {
            problems.push(format!(
                "PatientSex `{}` must be one of M, F, O or empty",
                self.patient_sex
            ));
        }

        for (key, value, max_len) in [
            ("PatientID", &self.patient_id, LO_MAX_LEN),
            ("StudyID", &self.study_id, SH_MAX_LEN),
            ("AccessionNumber", &self.accession_number, SH_MAX_LEN),
        ] {
            if value.chars().count() > max_len {
                problems.push(format!("{key} exceeds {max_len} characters"));
            }
            if value.chars().any(|c| c == '\\' || c.is_control()) {
                problems.push(format!(
                    "{key} contains a backslash or control character"
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            bail!("patient metadata failed validation:\n  {}", problems.join("\n  "))
        }
    }
}

fn is_dicom_date(value: &str) -> bool {
    value.len() == 8
        && value.chars().all(|c| c.is_ascii_digit())
        && NaiveDate::parse_from_str(value, "%Y%m%d").is_ok()
}

fn is_dicom_time(value: &str) -> bool {
    let (base, fraction) = match value.split_once('.') {
        Some((base, fraction)) => (base, Some(fraction)),
        None => (value, None),
    };

    if !matches!(base.len(), 2 | 4 | 6) || !base.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if let Some(fraction) = fraction {
        // a fraction is only allowed after full seconds
        if base.len() != 6
            || fraction.is_empty()
            || fraction.len() > 6
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return false;
        }
    }

    let padded = format!("{base:0<6}");
    NaiveTime::parse_from_str(&padded, "%H%M%S").is_ok()
}

#[cfg(test)]
impl PatientMetadata {
    pub(crate) fn example() -> Self {
        Self {
            patient_name: "DOE^JOHN".into(),
            patient_id: "123".into(),
            patient_birth_date: "19800101".into(),
            patient_sex: "M".into(),
            study_date: "20240101".into(),
            study_time: "120000".into(),
            study_id: "1".into(),
            accession_number: "ACC1".into(),
            study_description: "Test".into(),
            series_description: "Test Series".into(),
            referring_physician_name: "DR^SMITH".into(),
        }
    }
}
