//! `ModelNode`: the three kinds of tree node (branch, population, stop),
//! dispatched as a tagged enum rather than trait objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vpl_kernel::distributed_hash::DistributedConsistentHashing;
use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_kernel::event::LabelerEvent;
use vpl_kernel::filter::{Filter, FilterConfig};
use vpl_kernel::fingerprint::fingerprint64_str;

use crate::matcher::FieldFiltersMatcher;
use crate::multiplicity::MultiplicityImpl;
use crate::selector::{Pool, VirtualPersonSelector};
use crate::updater::{build_multiplicity, AttributesUpdater, MultiplicityConfig, UpdaterConfig};

/// How a branch picks its child index.
enum Selection {
    Chance(DistributedConsistentHashing),
    Condition(FieldFiltersMatcher),
}

/// What a branch does before recursing into its selected child.
enum Action {
    None,
    Updaters(Vec<AttributesUpdater>),
    Multiplicity(MultiplicityImpl),
}

pub struct BranchNode {
    children: Vec<Box<ModelNode>>,
    selection: Selection,
    action: Action,
    random_seed: String,
}

pub struct PopulationNode {
    /// `None` when every configured pool has zero population: build still
    /// succeeds, and `apply` becomes a no-op that leaves any existing
    /// virtual-person id untouched.
    selector: Option<VirtualPersonSelector>,
    random_seed: String,
}

/// A built tree node. Branch and population nodes own their children /
/// selector; stop nodes carry no state.
pub enum ModelNode {
    Branch(BranchNode),
    Population(PopulationNode),
    Stop,
}

impl ModelNode {
    /// Evaluate this node (and, for branch nodes, its selected subtree)
    /// against `event`, mutating it in place.
    ///
    /// # Errors
    ///
    /// Returns whatever error an updater, the multiplicity computation, or
    /// child selection produces.
    pub fn apply(&self, event: &mut LabelerEvent) -> LabelerResult<()> {
        match self {
            Self::Stop => Ok(()),
            Self::Population(node) => node.apply(event),
            Self::Branch(node) => node.apply(event),
        }
    }
}

impl PopulationNode {
    fn apply(&self, event: &mut LabelerEvent) -> LabelerResult<()> {
        let Some(selector) = &self.selector else {
            return Ok(());
        };

        if event.virtual_person_activities.is_empty() {
            event
                .virtual_person_activities
                .push(vpl_kernel::event::VirtualPersonActivity::default());
        }
        if event.virtual_person_activities[0].virtual_person_id.is_some() {
            return Err(LabelerError::InvalidArgument(
                "population node: event already carries a virtual_person_id".to_string(),
            ));
        }

        let seed = fingerprint64_str(&format!("{}{}", self.random_seed, event.acting_fingerprint));
        event.virtual_person_activities[0].virtual_person_id =
            Some(selector.get_virtual_person_id(seed));
        Ok(())
    }
}

impl BranchNode {
    fn apply(&self, event: &mut LabelerEvent) -> LabelerResult<()> {
        match &self.action {
            Action::Multiplicity(multiplicity) => self.apply_multiplicity(multiplicity, event),
            Action::Updaters(updaters) => {
                for updater in updaters {
                    updater.apply(event)?;
                }
                let index = self.select_child(event)?;
                self.children[index as usize].apply(event)
            }
            Action::None => {
                let index = self.select_child(event)?;
                self.children[index as usize].apply(event)
            }
        }
    }

    fn select_child(&self, event: &LabelerEvent) -> LabelerResult<i32> {
        let index = match &self.selection {
            Selection::Chance(hashing) => {
                let seed = format!("{}{}", self.random_seed, event.acting_fingerprint);
                hashing.hash(&seed)
            }
            Selection::Condition(matcher) => matcher.first_match(event),
        };
        if index < 0 || index as usize >= self.children.len() {
            return Err(LabelerError::InvalidArgument(
                "branch node: no child condition matched the event".to_string(),
            ));
        }
        Ok(index)
    }

    fn apply_multiplicity(
        &self,
        multiplicity: &MultiplicityImpl,
        event: &mut LabelerEvent,
    ) -> LabelerResult<()> {
        let clone_count = multiplicity.compute_event_multiplicity(event)?;
        if clone_count == 0 {
            return Ok(());
        }
        if clone_count == 1 {
            multiplicity
                .person_index_field()
                .set(event, vpl_kernel::field_path::FieldValue::I32(0));
            let index = self.select_child(event)?;
            return self.children[index as usize].apply(event);
        }

        let original_fingerprint = event.acting_fingerprint;
        let mut clone_activities = Vec::with_capacity(clone_count as usize);
        for i in 0..clone_count {
            let mut clone = event.clone();
            clone.acting_fingerprint = multiplicity.fingerprint_for_index(original_fingerprint, i);
            multiplicity
                .person_index_field()
                .set(&mut clone, vpl_kernel::field_path::FieldValue::I32(i));
            let index = self.select_child(&clone)?;
            self.children[index as usize].apply(&mut clone)?;
            clone_activities.push(clone.virtual_person_activities);
        }
        for activities in clone_activities {
            event.virtual_person_activities.extend(activities);
        }
        Ok(())
    }
}

// --- Configuration (JSON-facing) types and the recursive builder. ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    pub id_offset: i64,
    pub total_population: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationNodeConfig {
    pub pools: Vec<PoolConfig>,
    pub random_seed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BranchSelectorConfig {
    Chance {
        probability: f64,
    },
    Condition {
        filter: FilterConfig,
    },
}

/// A branch's child: either inlined in single-root form, or a reference
/// into the enclosing node-list's index map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ChildRefConfig {
    Inline { node: Box<CompiledNodeConfig> },
    NodeIndex { index: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchConfig {
    pub selector: BranchSelectorConfig,
    pub child: ChildRefConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ActionConfig {
    Updaters { updaters: Vec<UpdaterConfig> },
    Multiplicity { multiplicity: MultiplicityConfig },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchNodeConfig {
    pub branches: Vec<BranchConfig>,
    pub random_seed: String,
    pub action: Option<ActionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeKindConfig {
    Branch(BranchNodeConfig),
    Population(PopulationNodeConfig),
    Stop,
}

/// One node as it appears in either a single-root tree or a node-list
/// stream. `index` is `None` in single-root form (and for the root entry
/// of a serialized node-list); a child referencing a node carries the
/// referenced node's index via [`ChildRefConfig::NodeIndex`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledNodeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: NodeKindConfig,
}

/// Build one node, resolving any `NodeIndex` children by removing them
/// from `pending` (ownership transfer: each referenced node is consumed
/// exactly once).
///
/// # Errors
///
/// Returns [`LabelerError::InvalidArgument`] if a referenced child index
/// is not present in `pending`, if a branch mixes chance and condition
/// selectors, or if any nested build step fails.
pub fn build_node(
    config: CompiledNodeConfig,
    pending: &mut BTreeMap<u32, ModelNode>,
) -> LabelerResult<ModelNode> {
    match config.kind {
        NodeKindConfig::Stop => Ok(ModelNode::Stop),
        NodeKindConfig::Population(population) => build_population(population),
        NodeKindConfig::Branch(branch) => build_branch(branch, pending),
    }
}

fn build_population(config: PopulationNodeConfig) -> LabelerResult<ModelNode> {
    let pools: Vec<Pool> = config
        .pools
        .iter()
        .map(|p| Pool {
            id_offset: p.id_offset,
            total_population: p.total_population,
        })
        .collect();
    let total: u64 = pools.iter().map(|p| p.total_population).sum();
    let selector = if total == 0 {
        None
    } else {
        Some(VirtualPersonSelector::build(&pools)?)
    };
    Ok(ModelNode::Population(PopulationNode {
        selector,
        random_seed: config.random_seed,
    }))
}

fn build_branch(
    config: BranchNodeConfig,
    pending: &mut BTreeMap<u32, ModelNode>,
) -> LabelerResult<ModelNode> {
    if config.branches.is_empty() {
        return Err(LabelerError::InvalidArgument(
            "branch node requires at least one branch".to_string(),
        ));
    }

    let mut children = Vec::with_capacity(config.branches.len());
    let mut chances = Vec::new();
    let mut conditions = Vec::new();
    for branch in config.branches {
        let child = match branch.child {
            ChildRefConfig::Inline { node } => build_node(*node, pending)?,
            ChildRefConfig::NodeIndex { index } => pending.remove(&index).ok_or_else(|| {
                LabelerError::InvalidArgument(format!(
                    "branch references node_index {index}, which is not provided"
                ))
            })?,
        };
        children.push(Box::new(child));

        match branch.selector {
            BranchSelectorConfig::Chance { probability } => chances.push(probability),
            BranchSelectorConfig::Condition { filter } => conditions.push(filter),
        }
    }

    let selection = match (chances.len(), conditions.len()) {
        (n, 0) if n == children.len() => {
            let choices = chances
                .into_iter()
                .enumerate()
                .map(|(id, probability)| vpl_kernel::distributed_hash::WeightedChoice {
                    choice_id: id as i32,
                    probability,
                })
                .collect();
            Selection::Chance(DistributedConsistentHashing::build(choices)?)
        }
        (0, n) if n == children.len() => {
            let filters = conditions
                .iter()
                .map(Filter::build)
                .collect::<LabelerResult<Vec<_>>>()?;
            Selection::Condition(FieldFiltersMatcher::build(filters)?)
        }
        _ => {
            return Err(LabelerError::InvalidArgument(
                "branch node must use exactly one selector kind across all branches".to_string(),
            ))
        }
    };

    let action = match config.action {
        None => Action::None,
        Some(ActionConfig::Updaters { updaters }) => {
            let built = updaters
                .into_iter()
                .map(AttributesUpdater::build)
                .collect::<LabelerResult<Vec<_>>>()?;
            Action::Updaters(built)
        }
        Some(ActionConfig::Multiplicity { multiplicity }) => {
            Action::Multiplicity(build_multiplicity(multiplicity)?)
        }
    };

    Ok(ModelNode::Branch(BranchNode {
        children,
        selection,
        action,
        random_seed: config.random_seed,
    }))
}
