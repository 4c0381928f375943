//! A conditional-assignment updater wired into a full branch node: copies
//! gender/min_age/max_age from `acting_demo` to `corrected_demo` only when
//! all three source fields are set.

use vpl_kernel::event::{Demographic, Gender, LabelerEvent};
use vpl_kernel::filter::FilterConfig;
use vpl_model::assembly::build_from_root;
use vpl_model::node::{
    ActionConfig, BranchConfig, BranchNodeConfig, BranchSelectorConfig, ChildRefConfig,
    CompiledNodeConfig, NodeKindConfig,
};
use vpl_model::updater::{AssignmentConfig, UpdaterConfig};

fn tree() -> CompiledNodeConfig {
    let condition = FilterConfig::And {
        filters: vec![
            FilterConfig::IsSet {
                field: "acting_demo.gender".to_string(),
            },
            FilterConfig::IsSet {
                field: "acting_demo.min_age".to_string(),
            },
            FilterConfig::IsSet {
                field: "acting_demo.max_age".to_string(),
            },
        ],
    };
    let updater = UpdaterConfig::ConditionalAssignment {
        condition,
        assignments: vec![
            AssignmentConfig {
                source: "acting_demo.gender".to_string(),
                target: "corrected_demo.gender".to_string(),
            },
            AssignmentConfig {
                source: "acting_demo.min_age".to_string(),
                target: "corrected_demo.min_age".to_string(),
            },
            AssignmentConfig {
                source: "acting_demo.max_age".to_string(),
                target: "corrected_demo.max_age".to_string(),
            },
        ],
    };

    CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Branch(BranchNodeConfig {
            branches: vec![BranchConfig {
                selector: BranchSelectorConfig::Chance { probability: 1.0 },
                child: ChildRefConfig::Inline {
                    node: Box::new(CompiledNodeConfig {
                        index: None,
                        name: None,
                        kind: NodeKindConfig::Stop,
                    }),
                },
            }],
            random_seed: "pick-the-only-child".to_string(),
            action: Some(ActionConfig::Updaters {
                updaters: vec![updater],
            }),
        }),
    }
}

#[test]
fn fully_populated_demo_copies_through() {
    let node = build_from_root(tree()).unwrap();
    let mut event = LabelerEvent {
        acting_demo: Demographic {
            gender: Some(Gender::Female),
            min_age: Some(18),
            max_age: Some(24),
        },
        ..LabelerEvent::default()
    };
    node.apply(&mut event).unwrap();
    assert_eq!(event.corrected_demo, event.acting_demo);
}

#[test]
fn missing_field_leaves_corrected_demo_untouched() {
    let node = build_from_root(tree()).unwrap();
    let mut event = LabelerEvent {
        acting_demo: Demographic {
            gender: Some(Gender::Male),
            min_age: Some(30),
            max_age: None,
        },
        ..LabelerEvent::default()
    };
    node.apply(&mut event).unwrap();
    assert!(event.corrected_demo.is_unset());
}
