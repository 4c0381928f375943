//! Two-way chance split through the full `Labeler` façade, in both the
//! single-root and node-list model representations.

use vpl_kernel::event::{EventId, LabelerInput};
use vpl_labeler::Labeler;
use vpl_model::assembly::{build_from_list, build_from_root, to_node_list};
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
            random_seed: "pop-seed".to_string(),
        }),
    }
}

fn two_way_split() -> CompiledNodeConfig {
    CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Branch(BranchNodeConfig {
            branches: vec![
                BranchConfig {
                    selector: BranchSelectorConfig::Chance { probability: 0.4 },
                    child: ChildRefConfig::Inline {
                        node: Box::new(population(10)),
                    },
                },
                BranchConfig {
                    selector: BranchSelectorConfig::Chance { probability: 0.6 },
                    child: ChildRefConfig::Inline {
                        node: Box::new(population(20)),
                    },
                },
            ],
            random_seed: "TestBranchNodeSeed".to_string(),
            action: None,
        }),
    }
}

fn count_ids(labeler: &Labeler) -> (i64, i64) {
    let mut id10 = 0;
    let mut id20 = 0;
    for i in 0..10_000 {
        let input = LabelerInput {
            event_id: Some(EventId {
                id: Some(i.to_string()),
                id_fingerprint: None,
            }),
            profile_info: None,
        };
        let output = labeler.label(input).unwrap();
        match output.people[0].virtual_person_id {
            Some(10) => id10 += 1,
            Some(20) => id20 += 1,
            other => panic!("unexpected virtual_person_id: {other:?}"),
        }
    }
    (id10, id20)
}

#[test]
fn s1_single_root_split_is_within_tolerance() {
    let labeler = Labeler::build(build_from_root(two_way_split()).unwrap());
    let (id10, id20) = count_ids(&labeler);
    assert_eq!(id10 + id20, 10_000);
    assert!((3800..4200).contains(&id10), "id10 = {id10}");
    assert!((5800..6200).contains(&id20), "id20 = {id20}");
}

#[test]
fn s2_node_list_split_matches_single_root_behaviour() {
    let node_list = to_node_list(two_way_split()).unwrap();
    assert_eq!(node_list.len(), 3);
    let labeler = Labeler::build(build_from_list(node_list).unwrap());
    let (id10, id20) = count_ids(&labeler);
    assert_eq!(id10 + id20, 10_000);
    assert!((3800..4200).contains(&id10), "id10 = {id10}");
    assert!((5800..6200).contains(&id20), "id20 = {id20}");
}

#[test]
fn s1_and_s2_agree_event_by_event() {
    let single_root = Labeler::build(build_from_root(two_way_split()).unwrap());
    let node_list = Labeler::build(build_from_list(to_node_list(two_way_split()).unwrap()).unwrap());

    for i in 0..1_000 {
        let make_input = || LabelerInput {
            event_id: Some(EventId {
                id: Some(i.to_string()),
                id_fingerprint: None,
            }),
            profile_info: None,
        };
        let a = single_root.label(make_input()).unwrap();
        let b = node_list.label(make_input()).unwrap();
        assert_eq!(a, b, "event {i} diverged between representations");
    }
}
