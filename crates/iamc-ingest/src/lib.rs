pub mod csv_table;

pub use csv_table::{IDENTITY_COLUMNS, read_iamc_csv, read_iamc_reader};
