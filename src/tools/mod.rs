//! Tool system: schemas, descriptors, registry and the built-in tools.

pub mod arguments;
pub mod builtin;
pub mod descriptor;
pub mod items;
pub mod registry;
pub mod schema;
pub mod tool;
pub mod validation;

pub use arguments::ToolArguments;
pub use descriptor::FunctionDescriptor;
pub use items::{Item, ItemStore};
pub use registry::ToolRegistry;
pub use schema::{ParameterKind, ParameterSpec, ToolSchema};
pub use tool::{FnTool, Tool};
pub use validation::coerce_arguments;
