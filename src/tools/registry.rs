//! Static tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::arguments::ToolArguments;
use super::descriptor::FunctionDescriptor;
use super::tool::Tool;
use super::validation::coerce_arguments;
use crate::error::{NatfnError, Result};
use crate::extract::ParsedCall;

/// Registry mapping tool names to tools, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names are unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(NatfnError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style [`ToolRegistry::register`].
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Result<Self> {
        self.register(Arc::new(tool))?;
        Ok(self)
    }

    /// Look up a tool by exact name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.index
            .get(name)
            .map(|&i| self.tools[i].clone())
            .ok_or_else(|| NatfnError::UnknownTool(name.to_string()))
    }

    /// Descriptors for every tool, in registration order.
    pub fn describe_all(&self) -> Vec<FunctionDescriptor> {
        self.tools
            .iter()
            .map(|t| FunctionDescriptor::from_tool(t.as_ref()))
            .collect()
    }

    /// Resolve, coerce and execute a parsed call.
    pub async fn invoke(&self, call: &ParsedCall) -> Result<serde_json::Value> {
        let tool = self.resolve(&call.name)?;
        let raw = serde_json::Value::Object(call.arguments.clone());
        let args = coerce_arguments(tool.schema(), &raw)
            .map_err(|message| NatfnError::arguments(&call.name, message))?;

        let result = tool.execute(&ToolArguments::new(args)).await?;
        debug!(tool = %call.name, result = %result, "tool returned");
        Ok(result)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
