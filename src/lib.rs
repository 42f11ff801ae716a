//! # Sankertain - Supply-Chain Sankey Diagrams with Uncertainty
//!
//! **Sankertain** walks the supply chain of a Life Cycle Assessment activity,
//! scores every branch against an impact assessment method, and turns the
//! resulting tree into link data for a Sankey diagram. Monte Carlo results can
//! be shown either as quantile bands or as deviation-colored links.
//!
//! ## Core Workflow
//!
//! The crate is agnostic of the LCA engine and of the activity database. Both are
//! reached through the traits in [`backend`]; reference implementations live in
//! [`inventory`] (an in-memory database loaded from JSON) and [`lca`] (dense
//! matrices with sampled exchange uncertainty).
//!
//! 1.  **Load Your Data**: Build a [`inventory::Database`] from JSON, or implement
//!     [`backend::ActivityStore`] over your own data store.
//! 2.  **Traverse**: Use `SupplyChainTree::builder` to configure depth, cutoff and
//!     Monte Carlo sampling, then `traverse` the store with an [`backend::LcaBackend`].
//! 3.  **Transform**: Feed the [`tree::TraversalResult`] to [`transform::transform`]
//!     to bucket small flows, add emission flows and color the links.
//! 4.  **Render**: [`render::render_sankey`] produces a Plotly figure description
//!     that any Plotly frontend can draw.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sankertain::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let database = Database::from_json(r#"{
//!         "activities": [
//!             {"key": "bread", "name": "bread", "location": "DE", "exchanges": [
//!                 {"input": "flour", "amount": 0.7, "kind": "technosphere",
//!                  "uncertainty": {"distribution": "normal", "std_dev": 0.05}},
//!                 {"input": "co2", "amount": 0.2, "kind": "biosphere"}
//!             ]},
//!             {"key": "flour", "name": "flour", "location": "FR", "exchanges": [
//!                 {"input": "co2", "amount": 0.9, "kind": "biosphere"}
//!             ]}
//!         ],
//!         "methods": [{"name": "gwp", "factors": {"co2": 1.0}}]
//!     }"#)?;
//!     let lca = MatrixLca::new(&database).with_seed(7);
//!
//!     // Score the supply chain with 100 Monte Carlo draws per material flow.
//!     let result = SupplyChainTree::builder("bread", "gwp")
//!         .max_depth(3)
//!         .cutoff(0.01)
//!         .monte_carlo(100)
//!         .build()
//!         .traverse(&database, &lca)?;
//!
//!     // Split sampled flows into quantile bands and write the figure.
//!     let figure = render_sankey(result, &TransformOptions::default())?;
//!     println!("{}", figure.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod color;
pub mod error;
pub mod inventory;
pub mod lca;
pub mod prelude;
pub mod render;
pub mod score;
pub mod transform;
pub mod tree;
