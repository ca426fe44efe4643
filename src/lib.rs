//! natfn: function calling for local language models.
//!
//! Turns a natural-language request into a call of a registered tool. The
//! model either writes the call into its completion text or returns it
//! through the runtime's structured tool-call fields; both are decoded into
//! a [`extract::ParsedCall`], validated against the tool's schema and
//! dispatched through a [`tools::ToolRegistry`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use natfn::prelude::*;
//! use natfn::tools::builtin::default_registry;
//!
//! # async fn example() -> natfn::error::Result<()> {
//! let config = NatfnConfig::from_env()?;
//! let registry = default_registry(ItemStore::new(), config.http_client()?)?;
//!
//! let caller = config.function_caller()?;
//! let sum = caller.call("add 999 and -999", &registry).await?;
//! println!("{sum}");
//!
//! let mut agent = config.agent(Arc::new(registry))?;
//! println!("{}", agent.chat("add an apple to my list").await?);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod caller;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
