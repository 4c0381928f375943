//! A labeler built straight from a saved single-root model file, and the
//! same tree converted to node-list form and reloaded, agree on output.

use vpl_kernel::event::{EventId, LabelerInput};
use vpl_labeler::model_io::{convert_single_root_to_node_list, load_node_list, load_single_root, save_single_root};
use vpl_labeler::Labeler;
use vpl_model::node::{
    BranchConfig, BranchNodeConfig, BranchSelectorConfig, ChildRefConfig, CompiledNodeConfig,
    NodeKindConfig, PoolConfig, PopulationNodeConfig,
};

fn two_way_split() -> CompiledNodeConfig {
    let pop = |id_offset: i64| CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Population(PopulationNodeConfig {
            pools: vec![PoolConfig {
                id_offset,
                total_population: 1,
            }],
            random_seed: "pop-seed".to_string(),
        }),
    };
    CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Branch(BranchNodeConfig {
            branches: vec![
                BranchConfig {
                    selector: BranchSelectorConfig::Chance { probability: 0.4 },
                    child: ChildRefConfig::Inline {
                        node: Box::new(pop(10)),
                    },
                },
                BranchConfig {
                    selector: BranchSelectorConfig::Chance { probability: 0.6 },
                    child: ChildRefConfig::Inline {
                        node: Box::new(pop(20)),
                    },
                },
            ],
            random_seed: "disk-seed".to_string(),
            action: None,
        }),
    }
}

#[test]
fn model_writer_conversion_agrees_with_the_single_root_original() {
    let dir = tempfile::tempdir().unwrap();
    let single_root_path = dir.path().join("model.json");
    let node_list_path = dir.path().join("model.nodelist");

    save_single_root(&single_root_path, &two_way_split()).unwrap();
    convert_single_root_to_node_list(&single_root_path, &node_list_path).unwrap();

    let from_single_root = Labeler::build(load_single_root(&single_root_path).unwrap());
    let from_node_list = Labeler::build(load_node_list(&node_list_path).unwrap());

    for i in 0..500 {
        let make_input = || LabelerInput {
            event_id: Some(EventId {
                id: Some(i.to_string()),
                id_fingerprint: None,
            }),
            profile_info: None,
        };
        let a = from_single_root.label(make_input()).unwrap();
        let b = from_node_list.label(make_input()).unwrap();
        assert_eq!(a, b, "event {i} diverged after disk round-trip");
    }
}
