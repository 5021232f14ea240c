use uuid::Uuid;

/// Root for UIDs derived from a UUID (ISO/IEC 9834-8, DICOM PS3.5 B.2).
const UUID_UID_ROOT: &str = "2.25";

/// Generate a new globally unique DICOM UID.
pub fn generate_uid() -> String {
    format!("{}.{}", UUID_UID_ROOT, Uuid::new_v4().as_u128())
}

/// UIDs that identify the written instance and its enclosing study/series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceUids {
    pub sop_instance: String,
    pub study_instance: String,
    pub series_instance: String,
}

impl InstanceUids {
    pub fn generate() -> Self {
        Self {
            sop_instance: generate_uid(),
            study_instance: generate_uid(),
            series_instance: generate_uid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_uid_is_valid_dicom_uid() {
        let uid = generate_uid();
        assert!(uid.starts_with("2.25."));
        assert!(uid.len() <= 64, "uid too long: {uid}");
        assert!(uid.chars().all(|c| c.is_ascii_digit() || c == '.'));
        // components must not carry leading zeros
        for component in uid.split('.') {
            assert!(!component.is_empty());
            assert!(component == "0" || !component.starts_with('0'));
        }
    }

    #[test]
    fn instance_uids_are_distinct() {
        let first = InstanceUids::generate();
        let second = InstanceUids::generate();

        assert_ne!(first.sop_instance, first.study_instance);
        assert_ne!(first.study_instance, first.series_instance);
        assert_ne!(first, second);
    }
}
