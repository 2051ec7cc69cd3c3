//! Query translation into the remote query language.

pub mod compiler;
pub mod filter;

pub use compiler::{
    Compiled, ColumnExtractor, CompiledQuery, OBJECTS_NEEDING_MINIMAL_ALIASES, SoqlCompiler,
    relationship_name,
};
pub use filter::CompiledFilter;
