pub mod logging;
pub mod uid;
