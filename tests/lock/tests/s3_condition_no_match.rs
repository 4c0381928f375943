//! Condition-selected branches: a match picks the right child, and an
//! event matching neither branch fails the whole tree with invalid-argument.

use vpl_kernel::error::LabelerError;
use vpl_kernel::event::LabelerEvent;
use vpl_kernel::filter::FilterConfig;
use vpl_model::assembly::build_from_root;
use vpl_model::node::{
    BranchConfig, BranchNodeConfig, BranchSelectorConfig, ChildRefConfig, CompiledNodeConfig,
    NodeKindConfig, PoolConfig, PopulationNodeConfig,
};

fn population(id_offset: i64) -> CompiledNodeConfig {
    CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Population(PopulationNodeConfig {
            pools: vec![PoolConfig {
                id_offset,
                total_population: 1,
            }],
            random_seed: "seed".to_string(),
        }),
    }
}

fn country_branch(code: &str, child: CompiledNodeConfig) -> BranchConfig {
    BranchConfig {
        selector: BranchSelectorConfig::Condition {
            filter: FilterConfig::Equals {
                field: "person_country_code".to_string(),
                value: serde_json::json!(code),
            },
        },
        child: ChildRefConfig::Inline {
            node: Box::new(child),
        },
    }
}

fn tree() -> CompiledNodeConfig {
    CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Branch(BranchNodeConfig {
            branches: vec![
                country_branch("X", population(10)),
                country_branch("Y", population(20)),
            ],
            random_seed: "country-branch-seed".to_string(),
            action: None,
        }),
    }
}

#[test]
fn matching_branch_is_selected() {
    let node = build_from_root(tree()).unwrap();
    let mut event = LabelerEvent {
        person_country_code: Some("Y".to_string()),
        ..LabelerEvent::default()
    };
    node.apply(&mut event).unwrap();
    assert_eq!(event.virtual_person_activities[0].virtual_person_id, Some(20));
}

#[test]
fn unmatched_country_code_is_invalid_argument() {
    let node = build_from_root(tree()).unwrap();
    let mut event = LabelerEvent {
        person_country_code: Some("Z".to_string()),
        ..LabelerEvent::default()
    };
    let err = node.apply(&mut event).unwrap_err();
    assert!(matches!(err, LabelerError::InvalidArgument(_)));
}

#[test]
fn unset_country_code_is_invalid_argument() {
    let node = build_from_root(tree()).unwrap();
    let mut event = LabelerEvent::default();
    assert!(node.apply(&mut event).is_err());
}
