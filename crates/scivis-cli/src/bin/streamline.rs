//! `streamline <input> <output> <x> <y> <z> [--array NAME] [--step-size H] [--max-steps N]`

use std::process::ExitCode;

use scivis_cli::streamline::{run, StreamlineArgs, StreamlineSummary};

fn main() -> ExitCode {
    scivis_cli::drive(run, |args: &StreamlineArgs, summary: StreamlineSummary| {
        println!(
            "Streamline with {} points saved to {}",
            summary.points,
            args.output.display()
        );
    })
}
