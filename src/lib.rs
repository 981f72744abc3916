//! Synthesizes abstract statements that copy a source object graph into a
//! target object graph of a related shape.
//!
//! The synthesizer consults two read-only collaborators: a
//! [`TypeMetadata`] provider describing types, and a
//! [`MappingSourceResolver`] picking the source member for each target
//! member. [`TypeTable`] and [`NameMatchResolver`] are in-memory defaults.
pub mod core;
pub mod mapping;

pub use crate::core::config::{CyclePolicy, SynthesisConfig};
pub use crate::core::error::{ConfigError, SynthesisError};
pub use crate::core::metadata::TypeMetadata;
pub use crate::core::naming::{to_local_variable_name, to_singular, to_unique_name};
pub use crate::core::syntax::{Expr, Materialization, ReturnStyle, Stmt};
pub use crate::core::table::TypeTable;
pub use crate::core::types::{Accessibility, Conversion, MethodDef, PropertyDef, TypeId};
pub use crate::mapping::generator::MappingGenerator;
pub use crate::mapping::source::{MappingSource, MappingSourceResolver, NameMatchResolver};
pub use crate::mapping::synth::{StatementStream, SynthesisRequest, Synthesizer, Target};
pub use crate::mapping::wrapper::{WrapperInfo, detect_wrapper};
