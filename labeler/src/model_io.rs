//! Model file I/O: single-root JSON, and a length-prefixed node-list
//! stream standing in for the Riegeli record format the original
//! implementation reads and writes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use vpl_kernel::error::{LabelerError, LabelerResult};
use vpl_model::assembly::{build_from_list, build_from_root, to_node_list};
use vpl_model::node::{CompiledNodeConfig, ModelNode};

fn io_err(context: &str, err: std::io::Error) -> LabelerError {
    LabelerError::Internal(format!("{context}: {err}"))
}

fn json_err(context: &str, err: serde_json::Error) -> LabelerError {
    LabelerError::InvalidArgument(format!("{context}: {err}"))
}

/// Read a single-root model file (one JSON document, fully inlined) and
/// build it.
///
/// # Errors
///
/// Returns [`LabelerError::Internal`] on an I/O failure,
/// [`LabelerError::InvalidArgument`] on malformed JSON or an invalid tree.
pub fn load_single_root(path: &Path) -> LabelerResult<ModelNode> {
    let file = File::open(path).map_err(|e| io_err("opening single-root model file", e))?;
    let config: CompiledNodeConfig = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| json_err("parsing single-root model file", e))?;
    build_from_root(config)
}

/// Write a single-root model file.
///
/// # Errors
///
/// Returns [`LabelerError::Internal`] on an I/O failure.
pub fn save_single_root(path: &Path, config: &CompiledNodeConfig) -> LabelerResult<()> {
    let file = File::create(path).map_err(|e| io_err("creating single-root model file", e))?;
    serde_json::to_writer(BufWriter::new(file), config)
        .map_err(|e| io_err("writing single-root model file", std::io::Error::other(e)))
}

/// Read a node-list model file: a sequence of `u32` little-endian length
/// prefixes each followed by that many bytes of canonical JSON, in the
/// topological order [`to_node_list`] produces.
///
/// # Errors
///
/// Returns [`LabelerError::Internal`] on an I/O failure,
/// [`LabelerError::InvalidArgument`] on malformed JSON or an invalid tree.
pub fn load_node_list(path: &Path) -> LabelerResult<ModelNode> {
    let file = File::open(path).map_err(|e| io_err("opening node-list model file", e))?;
    let mut reader = BufReader::new(file);
    let mut configs = Vec::new();

    loop {
        let mut length_bytes = [0u8; 4];
        match reader.read_exact(&mut length_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(io_err("reading node-list record length", e)),
        }
        let length = u32::from_le_bytes(length_bytes) as usize;

        let mut record = vec![0u8; length];
        reader
            .read_exact(&mut record)
            .map_err(|e| io_err("reading node-list record body", e))?;
        let config: CompiledNodeConfig = serde_json::from_slice(&record)
            .map_err(|e| json_err("parsing node-list record", e))?;
        configs.push(config);
    }

    build_from_list(configs)
}

/// Write a node-list model file from already-serialized node records.
///
/// # Errors
///
/// Returns [`LabelerError::Internal`] on an I/O failure or if a record's
/// JSON does not round-trip through [`serde_json`].
pub fn save_node_list(path: &Path, configs: &[CompiledNodeConfig]) -> LabelerResult<()> {
    let file = File::create(path).map_err(|e| io_err("creating node-list model file", e))?;
    let mut writer = BufWriter::new(file);
    for config in configs {
        let bytes = serde_json::to_vec(config)
            .map_err(|e| io_err("serializing node-list record", std::io::Error::other(e)))?;
        let length = u32::try_from(bytes.len())
            .map_err(|_| LabelerError::Internal("node-list record too large to serialize".to_string()))?;
        writer
            .write_all(&length.to_le_bytes())
            .and_then(|()| writer.write_all(&bytes))
            .map_err(|e| io_err("writing node-list record", e))?;
    }
    Ok(())
}

/// Convert a single-root model file into a node-list model file, the job
/// `vpl-model-writer` performs.
///
/// # Errors
///
/// Propagates [`load_single_root`]'s, [`to_node_list`]'s, or
/// [`save_node_list`]'s error.
pub fn convert_single_root_to_node_list(input_path: &Path, output_path: &Path) -> LabelerResult<()> {
    let file = File::open(input_path).map_err(|e| io_err("opening single-root model file", e))?;
    let config: CompiledNodeConfig = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| json_err("parsing single-root model file", e))?;
    let node_list = to_node_list(config)?;
    save_node_list(output_path, &node_list)
}
