//! Record transformers used between extraction and loading

mod field_dropper;

pub use field_dropper::FieldDropper;
