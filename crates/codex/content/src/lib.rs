//! RevengateFile machinery: definition files in, a resolved object graph out.
//!
//! The pipeline is parse → flatten → resolve/materialize → relationship
//! build, run to completion (or failed atomically) by [`WorldLoader`]. The
//! result is a [`World`]: an explicit registry value owned by the caller,
//! with typed objects from `codex-core` behind shared or owned handles.
pub mod error;
pub mod loader;
pub mod prototypes;
pub mod records;
pub mod world;

mod resolve;

pub use error::LoadError;
pub use loader::WorldLoader;
pub use records::{ParsedFile, RawRecord, RecordRole, RefPolicy, RefToken, Value};
pub use world::World;
