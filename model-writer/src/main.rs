//! CLI that converts a single-root model file into the node-list stream
//! format the labeler loads at serving time.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use vpl_labeler::model_io::convert_single_root_to_node_list;

#[derive(Parser)]
#[command(about = "Convert a single-root virtual-people-labeler model into a node-list model")]
struct Args {
    #[arg(long = "input_model_path")]
    input_model_path: PathBuf,

    #[arg(long = "output_model_path")]
    output_model_path: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match convert_single_root_to_node_list(&args.input_model_path, &args.output_model_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("model-writer: {err}");
            ExitCode::FAILURE
        }
    }
}
