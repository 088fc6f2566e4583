pub mod annotated;

pub use annotated::write_annotated_csv;
