#![deny(unsafe_code)]

pub mod catalog;
pub mod criteria;
pub mod error;

pub use crate::catalog::NomenclatureCatalog;
pub use crate::criteria::{VettingCatalog, VettingCriterion, WORLD};
pub use crate::error::StandardsError;
