//! Aggregated exposure rows and the data-source seam

mod data;
pub mod loader;

pub use data::{ExposureRow, RegionFilter};
pub use loader::{
    load_exposure, load_exposure_from_reader, CsvExposureSource, ExposureSource,
    DEFAULT_BUSINESS_LINE,
};
