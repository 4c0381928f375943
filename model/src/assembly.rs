//! Tree assembly from either representation spec's model file formats use
//! (single-root, fully inlined; or a flat node-list with index-based child
//! references), plus the serializer converting the former into the latter.

use std::collections::BTreeMap;
use std::mem;

use vpl_kernel::error::{LabelerError, LabelerResult};

use crate::node::{
    build_node, BranchSelectorConfig, ChildRefConfig, CompiledNodeConfig, ModelNode, NodeKindConfig,
};

/// Build a tree from single-root form: every child is inlined, no entry may
/// carry an index.
///
/// # Errors
///
/// Returns [`LabelerError::InvalidArgument`] if `root.index` is set, or if
/// any nested build step fails (a `NodeIndex` child can never resolve here,
/// since no list of pending nodes is ever populated).
pub fn build_from_root(root: CompiledNodeConfig) -> LabelerResult<ModelNode> {
    if root.index.is_some() {
        return Err(LabelerError::InvalidArgument(
            "single-root model input must not carry a node index".to_string(),
        ));
    }
    build_node(root, &mut BTreeMap::new())
}

/// Build a tree from node-list form: entries are consumed in order, each
/// either filed under its `index` (to be consumed later by whichever
/// ancestor references it) or, if it carries no index, taken as the root.
///
/// Accepts two equally valid ways of marking the root: an explicit entry
/// with no index, or (as [`to_node_list`] produces) every entry carrying an
/// index, with the root being the lone index nothing else referenced.
///
/// # Errors
///
/// Returns [`LabelerError::InvalidArgument`] for a duplicated index, an
/// entry appearing after the root, a dangling `NodeIndex` reference, or
/// leftover unreferenced entries once assembly finishes. Returns
/// [`LabelerError::Internal`] if the list is empty.
pub fn build_from_list(configs: Vec<CompiledNodeConfig>) -> LabelerResult<ModelNode> {
    let mut pending: BTreeMap<u32, ModelNode> = BTreeMap::new();
    let mut root: Option<ModelNode> = None;

    for config in configs {
        if root.is_some() {
            return Err(LabelerError::InvalidArgument(
                "no node is allowed after the root node in a node-list model".to_string(),
            ));
        }
        match config.index {
            Some(index) => {
                if pending.contains_key(&index) {
                    return Err(LabelerError::InvalidArgument(format!(
                        "duplicated node index: {index}"
                    )));
                }
                let node = build_node(config, &mut pending)?;
                pending.insert(index, node);
            }
            None => {
                root = Some(build_node(config, &mut pending)?);
            }
        }
    }

    if let Some(root) = root {
        if !pending.is_empty() {
            return Err(LabelerError::InvalidArgument(
                "some nodes are not reachable from the model tree".to_string(),
            ));
        }
        return Ok(root);
    }

    match pending.len() {
        0 => Err(LabelerError::Internal(
            "node-list model contains no nodes".to_string(),
        )),
        1 => Ok(pending.into_iter().next().expect("length checked").1),
        _ => Err(LabelerError::InvalidArgument(
            "some nodes are not reachable from the model tree".to_string(),
        )),
    }
}

/// Convert single-root form into node-list form: a depth-first, post-order
/// walk assigning every node (children before parents, root last) a fresh
/// 0-based index.
///
/// # Errors
///
/// Returns [`LabelerError::InvalidArgument`] if any input node already
/// carries an index or a `NodeIndex` child reference (this serializer only
/// accepts fully-inlined single-root input).
pub fn to_node_list(root: CompiledNodeConfig) -> LabelerResult<Vec<CompiledNodeConfig>> {
    let mut output = Vec::new();
    let mut next_index = 0u32;
    add_to_node_list(root, &mut next_index, &mut output)?;
    Ok(output)
}

fn add_to_node_list(
    mut config: CompiledNodeConfig,
    next_index: &mut u32,
    output: &mut Vec<CompiledNodeConfig>,
) -> LabelerResult<u32> {
    if config.index.is_some() {
        return Err(LabelerError::InvalidArgument(
            "to_node_list input must not already carry a node index".to_string(),
        ));
    }

    if let NodeKindConfig::Branch(branch) = &mut config.kind {
        for b in &mut branch.branches {
            let placeholder = ChildRefConfig::NodeIndex { index: 0 };
            match mem::replace(&mut b.child, placeholder) {
                ChildRefConfig::Inline { node } => {
                    let assigned = add_to_node_list(*node, next_index, output)?;
                    b.child = ChildRefConfig::NodeIndex { index: assigned };
                }
                ChildRefConfig::NodeIndex { .. } => {
                    return Err(LabelerError::InvalidArgument(
                        "to_node_list input must not already carry node_index children"
                            .to_string(),
                    ));
                }
            }
        }
    }

    let assigned = *next_index;
    *next_index += 1;
    config.index = Some(assigned);
    output.push(config);
    Ok(assigned)
}
