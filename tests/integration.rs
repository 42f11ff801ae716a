//! Integration tests for sankertain
//!
//! End-to-end tests: database loading, matrix LCA, traversal, transformation
//! and figure rendering working together.
//!
mod common;
use common::*;
use sankertain::prelude::*;
use std::fs;

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn steel() -> Database {
        Database::from_json(STEEL_JSON).expect("Failed to load steel database")
    }

    #[test]
    fn test_deterministic_traversal_of_steel_chain() {
        let database = steel();
        let lca = MatrixLca::new(&database);

        let result = SupplyChainTree::builder("steel", "gwp")
            .build()
            .traverse(&database, &lca)
            .expect("Traversal failed");

        // steel -> coal -> steel (the cycle) -> {coal, ore}, then steel -> ore
        assert_eq!(result.sources, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(result.targets, vec![0, 1, 2, 3, 3, 1]);
        assert!(result.aborted.is_empty());
        assert!(result.is_consistent());

        // (1 + 2 * 3 + 1.5 * 0.2) / (1 - 2 * 0.01)
        let total = 7.3 / 0.98;
        assert!((result.total_score - total).abs() < 1e-9);
        assert!((result.scores[0].mean() - total).abs() < 1e-9);
        assert!((result.scores[2].mean() - 0.02 * total).abs() < 1e-9);
        assert!((result.scores[5].mean() - 0.3).abs() < 1e-9);

        assert_eq!(result.nodes[&2].name, "coal mining, PL");
        assert_eq!(result.nodes[&6].activity, Some(ActivityKey::from("ore")));
        println!("Traversed {} flows", result.len());
    }

    #[test]
    fn test_seeded_monte_carlo_is_reproducible() {
        let database = steel();
        let run = || {
            let lca = MatrixLca::new(&database).with_seed(7);
            SupplyChainTree::builder("steel", "gwp")
                .monte_carlo(50)
                .build()
                .traverse(&database, &lca)
                .expect("Monte Carlo traversal failed")
        };

        let first = run();
        let second = run();

        assert_eq!(first, second);
        let root = first.scores[0].samples().expect("root flow is sampled");
        assert_eq!(root.len(), 50);
        assert_eq!(first.total_score, sankertain::score::median(root));
        assert!(first.total_score > 5.0 && first.total_score < 10.0);
        assert!(first.scores[0].std_dev() > 0.0);
    }

    #[test]
    fn test_unknown_method_is_an_evaluator_error() {
        let database = steel();
        let lca = MatrixLca::new(&database);

        let err = SupplyChainTree::builder("steel", "unknown-method")
            .build()
            .traverse(&database, &lca)
            .unwrap_err();

        assert_eq!(
            err,
            TraversalError::Evaluator(EvaluatorError::UnknownMethod("unknown-method".to_string()))
        );
    }

    #[test]
    fn test_render_deterministic_figure() {
        let database = steel();
        let lca = MatrixLca::new(&database);
        let result = SupplyChainTree::builder("steel", "gwp")
            .build()
            .traverse(&database, &lca)
            .expect("Traversal failed");
        let node_count = result.nodes.len();

        let figure = render_sankey(result, &TransformOptions::default()).expect("Render failed");
        let trace = figure.trace();

        assert_eq!(trace.kind, "sankey");
        assert_eq!(trace.node.label.len(), node_count + 4);
        assert_eq!(trace.node.label[0], "");
        assert_eq!(trace.node.label[1], "steel production, DE");
        assert_eq!(trace.node.color[0], "white");
        assert!(trace.node.color[1..].iter().all(|c| c == "grey"));
        assert_eq!(trace.node.line.color[0], "white");
        assert_eq!(trace.node.line.color[1], "black");
        assert_eq!(trace.node.line.width.len(), node_count + 4);
        assert!(trace.node.line.width.iter().all(|&w| w == 0.5));
        assert_eq!(trace.link.source.len(), trace.link.value.len());
        assert_eq!(trace.link.color.len(), trace.link.value.len());
        assert!(trace.link.value.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_figure_json_matches_plotly_layout() {
        let database = steel();
        let lca = MatrixLca::new(&database).with_seed(11);
        let result = SupplyChainTree::builder("steel", "gwp")
            .monte_carlo(30)
            .build()
            .traverse(&database, &lca)
            .expect("Traversal failed");

        let figure = render_sankey(result, &TransformOptions::default()).expect("Render failed");
        let json = figure.to_json().expect("Serialization failed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");

        assert_eq!(value["layout"]["width"], 1400);
        assert_eq!(value["layout"]["height"], 800);
        let trace = &value["data"][0];
        assert_eq!(trace["type"], "sankey");
        assert_eq!(trace["node"]["pad"], 80);
        assert_eq!(trace["node"]["thickness"], 20);
        assert_eq!(trace["link"]["arrowlen"], 10);
        let color = trace["link"]["color"][0].as_str().expect("colors are strings");
        assert!(color.starts_with("rgba("));

        // the sampled root flow is split into quantile bands
        let root_links = trace["link"]["source"]
            .as_array()
            .expect("sources are an array")
            .iter()
            .filter(|s| *s == 1)
            .count();
        assert_eq!(root_links, sankertain::transform::QUANTILES.len());
    }

    #[test]
    fn test_deviation_mode_end_to_end() {
        let database = steel();
        let lca = MatrixLca::new(&database).with_seed(3);
        let result = SupplyChainTree::builder("steel", "gwp")
            .monte_carlo(30)
            .build()
            .traverse(&database, &lca)
            .expect("Traversal failed");
        let flows = result.len();

        let options = TransformOptions {
            mode: UncertaintyMode::Deviation,
            emissions: false,
            ..TransformOptions::default()
        };
        let (sankey, labels) = transform(result, &options).expect("Transform failed");

        assert_eq!(sankey.len(), flows);
        assert_eq!(labels.len(), sankey.nodes.len());
    }

    #[test]
    fn test_database_from_file() {
        let path = std::env::temp_dir().join("sankertain_steel_database.json");
        fs::write(&path, STEEL_JSON).expect("Failed to write test database");

        let database = Database::from_file(path.to_str().expect("utf-8 temp path"))
            .expect("Failed to load database file");
        assert_eq!(database.len(), 3);
        fs::remove_file(&path).ok();

        let missing = Database::from_file("/nonexistent/database.json").unwrap_err();
        assert!(matches!(missing, StoreError::Io { .. }));
    }

    #[test]
    fn test_raw_result_serializes_and_restores() {
        let database = steel();
        let lca = MatrixLca::new(&database);
        let result = SupplyChainTree::builder("steel", "gwp")
            .max_depth(1)
            .build()
            .traverse(&database, &lca)
            .expect("Traversal failed");

        let json = serde_json::to_string(&result).expect("Serialization failed");
        let restored: TraversalResult = serde_json::from_str(&json).expect("Invalid JSON");

        assert_eq!(restored.sources, result.sources);
        assert_eq!(restored.targets, result.targets);
        assert_eq!(restored.nodes, result.nodes);
        for (restored, original) in restored.scores.iter().zip(&result.scores) {
            assert!((restored.mean() - original.mean()).abs() < 1e-12);
        }
    }
}
