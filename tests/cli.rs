use dicom::dictionary_std::tags;
use dicom_object::{open_file, DefaultDicomObject};
use dicom_pixeldata::PixelDecoder;
use image::{GrayImage, Luma, Rgb, RgbImage};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

const PATIENT_JSON: &str = r#"{"PatientName":"DOE^JOHN","PatientID":"123","PatientBirthDate":"19800101","PatientSex":"M","StudyDate":"20240101","StudyTime":"120000","StudyID":"1","AccessionNumber":"ACC1","StudyDescription":"Test","SeriesDescription":"Test Series","ReferringPhysicianName":"DR^SMITH"}"#;

fn png2dicom(workdir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_png2dicom"))
        .current_dir(workdir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to launch png2dicom")
}

fn gradient(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x * 3 + y) % 256) as u8]))
}

/// Working directory holding `patient.json` and a 100x50 greyscale `input.png`.
fn workspace() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("patient.json"), PATIENT_JSON).unwrap();
    gradient(100, 50).save(dir.path().join("input.png")).unwrap();
    dir
}

fn text(obj: &DefaultDicomObject, tag: dicom::core::Tag) -> String {
    obj.element(tag).unwrap().to_str().unwrap().to_string()
}

fn number(obj: &DefaultDicomObject, tag: dicom::core::Tag) -> u16 {
    obj.element(tag).unwrap().to_int::<u16>().unwrap()
}

#[test]
fn missing_arguments_print_usage_and_exit_1() {
    let dir = workspace();

    for args in [&[][..], &["input.png"][..]] {
        let out = png2dicom(dir.path(), args);
        assert_eq!(out.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("Usage"), "{stderr}");
    }
}

#[test]
fn help_exits_0() {
    let dir = workspace();
    let out = png2dicom(dir.path(), &["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--patient"));
}

#[test]
fn missing_sidecar_exits_1_without_output() {
    let dir = workspace();
    fs::remove_file(dir.path().join("patient.json")).unwrap();

    let out = png2dicom(dir.path(), &["input.png", "output.dcm"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("patient.json"), "{stderr}");
    assert!(stderr.contains("not found"), "{stderr}");
    assert!(!dir.path().join("output.dcm").exists());
}

#[test]
fn missing_key_exits_1_without_output() {
    let dir = workspace();
    fs::write(
        dir.path().join("patient.json"),
        PATIENT_JSON.replace(r#""StudyID":"1","#, ""),
    )
    .unwrap();

    let out = png2dicom(dir.path(), &["input.png", "output.dcm"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("StudyID"));
    assert!(!dir.path().join("output.dcm").exists());
}

#[test]
fn example_scenario() {
    let dir = workspace();

    let out = png2dicom(dir.path(), &["input.png", "output.dcm"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("output.dcm"), "{stdout}");

    let obj = open_file(dir.path().join("output.dcm")).unwrap();
    assert_eq!(obj.meta().transfer_syntax(), "1.2.840.10008.1.2.1");
    assert_eq!(text(&obj, tags::SOP_CLASS_UID), "1.2.840.10008.5.1.4.1.1.7");
    assert_eq!(number(&obj, tags::ROWS), 50);
    assert_eq!(number(&obj, tags::COLUMNS), 100);
    assert_eq!(text(&obj, tags::PATIENT_NAME), "DOE^JOHN");
    assert_eq!(text(&obj, tags::MODALITY), "SC");
    assert_eq!(text(&obj, tags::PHOTOMETRIC_INTERPRETATION), "MONOCHROME2");
    assert_eq!(number(&obj, tags::BITS_ALLOCATED), 8);
    assert_eq!(number(&obj, tags::BITS_STORED), 8);

    let pixel_data = obj.element(tags::PIXEL_DATA).unwrap().to_bytes().unwrap();
    assert_eq!(pixel_data.len(), 100 * 50);
}

#[test]
fn pixels_decode_back_to_the_input() {
    let dir = workspace();
    let out = png2dicom(dir.path(), &["input.png", "output.dcm"]);
    assert!(out.status.success());

    let obj = open_file(dir.path().join("output.dcm")).unwrap();
    let decoded = obj.decode_pixel_data().unwrap();
    assert_eq!(decoded.rows(), 50);
    assert_eq!(decoded.columns(), 100);
    assert_eq!(decoded.samples_per_pixel(), 1);
    assert_eq!(decoded.data(), gradient(100, 50).as_raw().as_slice());
}

#[test]
fn metadata_is_copied_verbatim() {
    let dir = workspace();
    let out = png2dicom(dir.path(), &["input.png", "output.dcm"]);
    assert!(out.status.success());

    let obj = open_file(dir.path().join("output.dcm")).unwrap();
    let expected = [
        (tags::PATIENT_NAME, "DOE^JOHN"),
        (tags::PATIENT_ID, "123"),
        (tags::PATIENT_BIRTH_DATE, "19800101"),
        (tags::PATIENT_SEX, "M"),
        (tags::STUDY_DATE, "20240101"),
        (tags::STUDY_TIME, "120000"),
        (tags::STUDY_ID, "1"),
        (tags::ACCESSION_NUMBER, "ACC1"),
        (tags::STUDY_DESCRIPTION, "Test"),
        (tags::SERIES_DESCRIPTION, "Test Series"),
        (tags::REFERRING_PHYSICIAN_NAME, "DR^SMITH"),
    ];
    for (tag, value) in expected {
        assert_eq!(text(&obj, tag), value, "{tag}");
    }
}

#[test]
fn every_run_gets_fresh_uids() {
    let dir = workspace();
    assert!(png2dicom(dir.path(), &["input.png", "first.dcm"]).status.success());
    assert!(png2dicom(dir.path(), &["input.png", "second.dcm"]).status.success());

    let first = open_file(dir.path().join("first.dcm")).unwrap();
    let second = open_file(dir.path().join("second.dcm")).unwrap();
    for tag in [
        tags::SOP_INSTANCE_UID,
        tags::STUDY_INSTANCE_UID,
        tags::SERIES_INSTANCE_UID,
    ] {
        assert_ne!(text(&first, tag), text(&second, tag), "{tag}");
    }
}

#[test]
fn sidecar_path_can_be_overridden() {
    let dir = workspace();
    let sidecar = dir.path().join("meta").join("case-7.json");
    fs::create_dir_all(sidecar.parent().unwrap()).unwrap();
    fs::rename(dir.path().join("patient.json"), &sidecar).unwrap();

    let out = png2dicom(
        dir.path(),
        &["input.png", "output.dcm", "--patient", sidecar.to_str().unwrap()],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
}

#[test]
fn rgb_mode_writes_interleaved_rgb() {
    let dir = workspace();
    RgbImage::from_pixel(6, 4, Rgb([255, 128, 0]))
        .save(dir.path().join("colour.png"))
        .unwrap();

    let out = png2dicom(
        dir.path(),
        &["colour.png", "colour.dcm", "--color-mode", "rgb"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let obj = open_file(dir.path().join("colour.dcm")).unwrap();
    assert_eq!(number(&obj, tags::ROWS), 4);
    assert_eq!(number(&obj, tags::COLUMNS), 6);
    assert_eq!(number(&obj, tags::SAMPLES_PER_PIXEL), 3);
    assert_eq!(text(&obj, tags::PHOTOMETRIC_INTERPRETATION), "RGB");
    assert_eq!(number(&obj, tags::PLANAR_CONFIGURATION), 0);

    let pixel_data = obj.element(tags::PIXEL_DATA).unwrap().to_bytes().unwrap();
    assert_eq!(pixel_data.len(), 6 * 4 * 3);
    assert_eq!(&pixel_data[..6], &[255u8, 128, 0, 255, 128, 0]);
}

#[test]
fn unreadable_image_exits_1() {
    let dir = workspace();
    fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

    let out = png2dicom(dir.path(), &["broken.png", "output.dcm"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("output.dcm").exists());
}
