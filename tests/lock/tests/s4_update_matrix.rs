//! An update-matrix updater wired into a full branch node (updaters, then
//! child selection) rather than driven directly, to cross-check the
//! updater-construction path `build_node` wires through.

use vpl_kernel::event::{Gender, LabelerEvent};
use vpl_kernel::filter::FilterConfig;
use vpl_model::assembly::build_from_root;
use vpl_model::node::{
    ActionConfig, BranchConfig, BranchNodeConfig, BranchSelectorConfig, ChildRefConfig,
    CompiledNodeConfig, NodeKindConfig,
};
use vpl_model::updater::{ColumnMatcherConfig, UpdaterConfig};

fn gender_row(gender: Gender) -> LabelerEvent {
    LabelerEvent {
        acting_demo: vpl_kernel::event::Demographic {
            gender: Some(gender),
            ..Default::default()
        },
        ..LabelerEvent::default()
    }
}

fn stop() -> CompiledNodeConfig {
    CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Stop,
    }
}

fn tree_with_matrix_updater() -> CompiledNodeConfig {
    let column_matcher = ColumnMatcherConfig::FieldFilters {
        filters: vec![
            FilterConfig::Equals {
                field: "person_country_code".to_string(),
                value: serde_json::json!("RAW_1"),
            },
            FilterConfig::Equals {
                field: "person_country_code".to_string(),
                value: serde_json::json!("RAW_2"),
            },
        ],
    };
    let updater = UpdaterConfig::UpdateMatrix {
        column_matcher,
        num_columns: 2,
        row_templates: vec![gender_row(Gender::Male), gender_row(Gender::Female)],
        probabilities: vec![0.8, 0.2, 0.2, 0.8],
        random_seed: "s4-tree-seed".to_string(),
        pass_through_non_matches: false,
    };

    CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Branch(BranchNodeConfig {
            branches: vec![BranchConfig {
                selector: BranchSelectorConfig::Chance { probability: 1.0 },
                child: ChildRefConfig::Inline {
                    node: Box::new(stop()),
                },
            }],
            random_seed: "pick-the-only-child".to_string(),
            action: Some(ActionConfig::Updaters {
                updaters: vec![updater],
            }),
        }),
    }
}

fn run_column(node: &vpl_model::node::ModelNode, country_code: &str, n: u64) -> f64 {
    let mut male_count = 0u64;
    for i in 0..n {
        let mut event = LabelerEvent {
            person_country_code: Some(country_code.to_string()),
            acting_fingerprint: i,
            ..LabelerEvent::default()
        };
        node.apply(&mut event).unwrap();
        if event.acting_demo.gender == Some(Gender::Male) {
            male_count += 1;
        }
    }
    male_count as f64 / n as f64
}

#[test]
fn s4_raw1_skews_toward_male() {
    let node = build_from_root(tree_with_matrix_updater()).unwrap();
    let frac = run_column(&node, "RAW_1", 10_000);
    assert!((0.78..0.82).contains(&frac), "frac = {frac}");
}

#[test]
fn s4_raw2_skews_toward_female() {
    let node = build_from_root(tree_with_matrix_updater()).unwrap();
    let frac = run_column(&node, "RAW_2", 10_000);
    assert!((0.18..0.22).contains(&frac), "frac = {frac}");
}

#[test]
fn s4_unmatched_column_fails_the_whole_apply() {
    let node = build_from_root(tree_with_matrix_updater()).unwrap();
    let mut event = LabelerEvent {
        person_country_code: Some("RAW_3".to_string()),
        ..LabelerEvent::default()
    };
    assert!(node.apply(&mut event).is_err());
}
