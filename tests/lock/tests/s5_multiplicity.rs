//! A multiplicity branch wired through the full `Labeler`: each event
//! produces one or two virtual-person activities, averaging the configured
//! expected multiplicity.

use vpl_kernel::event::{EventId, LabelerInput};
use vpl_labeler::Labeler;
use vpl_model::assembly::build_from_root;
use vpl_model::node::{
    ActionConfig, BranchConfig, BranchNodeConfig, BranchSelectorConfig, ChildRefConfig,
    CompiledNodeConfig, NodeKindConfig, PoolConfig, PopulationNodeConfig,
};
use vpl_model::updater::{ExpectedMultiplicityConfig, MultiplicityConfig};

fn tree() -> CompiledNodeConfig {
    let population = CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Population(PopulationNodeConfig {
            pools: vec![PoolConfig {
                id_offset: 10,
                total_population: 1,
            }],
            random_seed: "pop-seed".to_string(),
        }),
    };

    CompiledNodeConfig {
        index: None,
        name: None,
        kind: NodeKindConfig::Branch(BranchNodeConfig {
            branches: vec![BranchConfig {
                selector: BranchSelectorConfig::Chance { probability: 1.0 },
                child: ChildRefConfig::Inline {
                    node: Box::new(population),
                },
            }],
            random_seed: "pick-the-only-child".to_string(),
            action: Some(ActionConfig::Multiplicity {
                multiplicity: MultiplicityConfig {
                    expected_multiplicity: ExpectedMultiplicityConfig::Constant(1.2),
                    max_value: 2.0,
                    cap_at_max: true,
                    person_index_field: "multiplicity_person_index".to_string(),
                    random_seed: "s5-multiplicity-seed".to_string(),
                },
            }),
        }),
    }
}

#[test]
fn s5_total_activities_track_expected_multiplicity() {
    let labeler = Labeler::build(build_from_root(tree()).unwrap());
    let n: i32 = 10_000;
    let mut total = 0usize;
    for i in 0..n {
        let input = LabelerInput {
            event_id: Some(EventId {
                id: Some(i.to_string()),
                id_fingerprint: None,
            }),
            profile_info: None,
        };
        let output = labeler.label(input).unwrap();
        assert!(
            (1..=2).contains(&output.people.len()),
            "event {i} produced {} activities",
            output.people.len()
        );
        for person in &output.people {
            assert_eq!(person.virtual_person_id, Some(10));
        }
        total += output.people.len();
    }
    let average = total as f64 / f64::from(n);
    assert!((11_500..12_500).contains(&total), "total = {total}");
    assert!((1.15..1.25).contains(&average), "average = {average}");
}
