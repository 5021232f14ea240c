use crate::logic::decode::ColorMode;
use crate::logic::workflow::{convert_image_to_dicom, ConversionOptions};
use crate::models::patient::DEFAULT_PATIENT_FILE;
use clap::{ArgAction, Parser};
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input image (PNG or any other supported raster format)
    pub input: PathBuf,

    /// Output DICOM file
    pub output: PathBuf,

    /// JSON file holding patient and study attributes
    #[arg(long, default_value = DEFAULT_PATIENT_FILE)]
    pub patient: PathBuf,

    /// How the input pixels are stored
    #[arg(long, value_enum, default_value_t = ColorMode::Greyscale)]
    pub color_mode: ColorMode,

    /// Validate dates, times and identifiers in the patient file first
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn options(&self) -> ConversionOptions {
        ConversionOptions {
            patient_path: self.patient.clone(),
            color_mode: self.color_mode,
            strict: self.strict,
        }
    }
}

pub fn run_cli(cli: Cli) {
    tracing::info!(input = %cli.input.display(), output = %cli.output.display(), "starting conversion");

    match convert_image_to_dicom(&cli.input, &cli.output, &cli.options()) {
        Ok(summary) => {
            println!(
                "{} DICOM ready: {}",
                "✔".green(),
                summary.output_path.display()
            );
            println!("{}", summary.describe());
        }
        Err(e) => {
            eprintln!("{} Conversion failed:\n{:#}", "✖".red(), e);
            std::process::exit(1);
        }
    }
}
