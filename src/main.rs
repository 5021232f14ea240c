use clap::Parser;
use png2dicom_lib::cli::Cli;

fn main() {
    match Cli::try_parse() {
        Ok(cli) => {
            png2dicom_lib::utils::logging::init_tracing(cli.verbose);
            png2dicom_lib::cli::run_cli(cli);
        }
        Err(e) => {
            // --help and --version go to stdout and succeed; usage errors exit 1
            let _ = e.print();
            let code = if e.use_stderr() { 1 } else { 0 };
            std::process::exit(code);
        }
    }
}
