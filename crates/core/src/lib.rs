//! Typed client bindings and reactive hooks from HTTP route descriptors.
//!
//! The pipeline is:
//!
//! 1. [`DescriptorSet`] parses the upstream JSON document.
//! 2. [`RouteTree::build`] validates the routes and arranges them by segment.
//! 3. [`emitter::emit`] plans every operation (names, cache key, composed
//!    arguments) and renders TypeScript modules for each requested [`Target`].
//!
//! [`generate`] runs all three steps.

pub mod compose;
pub mod config;
pub mod descriptor;
pub mod emitter;
pub mod error;
pub mod ir;
pub mod status;
pub mod synth;
pub mod targets;
pub mod tree;

use tracing::debug;

pub use config::GeneratorConfig;
pub use descriptor::{DescriptorSet, HttpMethod, RouteDescriptor};
pub use emitter::{Binding, BindingKind, EmitOptions, Emission, GeneratedModule};
pub use error::{GenerateError, Warning};
pub use status::StatusPredicate;
pub use targets::Target;
pub use tree::RouteTree;

/// Generate bindings for every operation in a descriptor document.
pub fn generate(
    json: &str,
    targets: &[Target],
    options: &EmitOptions,
) -> Result<Emission, GenerateError> {
    let set = DescriptorSet::from_json(json)?;
    debug!(operations = set.operations.len(), "Parsed route descriptors.");

    let tree = RouteTree::build(&set.operations)?;
    emitter::emit(&tree, targets, options)
}
