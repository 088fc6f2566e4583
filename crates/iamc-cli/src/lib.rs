//! CLI library components for the IAMC scenario validator.

pub mod logging;
