//! Built-in demo tools.
//!
//! Provides `add`, `add_item` and `get_catcode`. Each tool is constructed via
//! [`FnTool::new`] and returned as `Arc<dyn Tool>`; state the tools touch
//! (the item list, the HTTP client) is injected by the caller.
//!
//! # Usage
//!
//! ```rust
//! use natfn::tools::builtin::default_registry;
//! use natfn::tools::ItemStore;
//!
//! let registry = default_registry(ItemStore::new(), reqwest::Client::new()).unwrap();
//! assert_eq!(registry.names(), ["add_item", "get_catcode", "add"]);
//! ```

use std::sync::Arc;

use tracing::info;

use crate::error::{NatfnError, Result};
use crate::tools::items::{Item, ItemStore};
use crate::tools::registry::ToolRegistry;
use crate::tools::schema::ToolSchema;
use crate::tools::tool::{FnTool, Tool};

pub const DEFAULT_CATCODE_URL: &str = "https://http.cat";

/// Create the `add` tool: sums two integers.
pub fn add_tool() -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "add",
        "adds two numbers and returns the sum",
        ToolSchema::builder()
            .integer("a", "The number", true)
            .integer("b", "The number", true)
            .build(),
        |args| async move {
            let a = args.get_i64("a")?;
            let b = args.get_i64("b")?;
            info!(a, b, "adding");
            let sum = a
                .checked_add(b)
                .ok_or_else(|| NatfnError::tool("add", format!("{a} + {b} overflows")))?;
            Ok(serde_json::json!(sum))
        },
    ))
}

/// Create the `add_item` tool, which appends a timestamped item to `items`.
pub fn add_item_tool(items: ItemStore) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "add_item",
        "add an item at a specific time to the list of items and return the item",
        ToolSchema::builder()
            .string("item_name", "The name of the item", true)
            .build(),
        move |args| {
            let items = items.clone();
            async move {
                let item = Item::now(args.get_str("item_name")?);
                info!(item = %item.item_name, time = %item.time, "adding item");
                items.push(item.clone());
                Ok(serde_json::to_value(item)?)
            }
        },
    ))
}

/// Create the `get_catcode` tool, which returns the HTTP status of `GET {url}/{status_code}`.
pub fn get_catcode_tool(client: reqwest::Client) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "get_catcode",
        "get the status code of a request to a URL",
        ToolSchema::builder()
            .integer("status_code", "The status code of the request", true)
            .string("url", "The URL to call", false)
            .with_default(DEFAULT_CATCODE_URL)
            .build(),
        move |args| {
            let client = client.clone();
            async move {
                let status_code = args.get_i64("status_code")?;
                let url = args.get_str_opt("url").unwrap_or(DEFAULT_CATCODE_URL);
                let target = format!("{}/{status_code}", url.trim_end_matches('/'));
                info!(url = %target, "calling");
                let response = client.get(&target).send().await?;
                Ok(serde_json::json!(response.status().as_u16()))
            }
        },
    ))
}

/// Registry with all built-in tools, in the order they are offered to the model.
pub fn default_registry(items: ItemStore, client: reqwest::Client) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    for tool in [add_item_tool(items), get_catcode_tool(client), add_tool()] {
        registry.register(tool)?;
    }
    Ok(registry)
}
