//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the sankertain crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use sankertain::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let database = Database::from_file("path/to/database.json")?;
//! let lca = MatrixLca::new(&database);
//!
//! let result = SupplyChainTree::builder("steel", "gwp").build().traverse(&database, &lca)?;
//! let (links, labels) = transform(result, &TransformOptions::default())?;
//! println!("{} links between {} nodes", links.len(), labels.len());
//! # Ok(())
//! # }
//! ```

// Traversal
pub use crate::tree::{
    Node, NodeId, SupplyChainTree, TraversalOptions, TraversalResult, TreeBuilder,
};

// Transformation and rendering
pub use crate::render::{SankeyFigure, render_sankey};
pub use crate::transform::{SankeyResult, TransformOptions, UncertaintyMode, transform};

// Scores and colors
pub use crate::color::{Color, Gradient, GradientTable, Palette};
pub use crate::score::Score;

// Collaborators and reference implementations
pub use crate::backend::{ActivityStore, Demand, LcaBackend, LcaEvaluator, demand_of};
pub use crate::inventory::{
    Activity, ActivityDefinition, ActivityKey, Database, DatabaseDefinition, Exchange,
    ExchangeDefinition, ExchangeKind, IntoDatabase, MethodDefinition, Uncertainty,
};
pub use crate::lca::{MatrixEvaluator, MatrixLca};

// Error types
pub use crate::error::{EvaluatorError, StoreError, TransformError, TraversalError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
