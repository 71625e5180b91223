pub mod enums;
pub mod metric;
pub mod observation;
pub mod patient;
pub mod result;

pub use metric::*;
pub use observation::*;
pub use patient::*;
pub use result::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
