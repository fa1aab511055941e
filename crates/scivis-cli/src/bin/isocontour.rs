//! `isocontour <input> <output> <iso-value> [--array NAME]`

use std::process::ExitCode;

use scivis_cli::isocontour::{run, IsocontourArgs};

fn main() -> ExitCode {
    scivis_cli::drive(run, |args: &IsocontourArgs, _summary| {
        println!("Isocontour saved to {}", args.output.display());
    })
}
