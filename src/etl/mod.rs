//! Core ETL (Extract, Transform, Load) abstractions
//!
//! Export and import are both modelled as small pipelines: saved queries are
//! extracted from a source (the remote service or JSON files), transformed,
//! and loaded into a destination (JSON files or the remote service).

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::{IdentityTransformer, Transformer};
