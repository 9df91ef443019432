//! `multibuild build` command

use anyhow::Result;

use multibuild::core::report::OverallOutcome;
use multibuild::ops::{run_batch, RunOptions};
use multibuild::util::shell::{ColorChoice, Shell};

use crate::cli::{BuildArgs, Cli};
use crate::commands::config_store;

/// Exit code for a cancelled run, distinct from plain failure.
const EXIT_CANCELLED: i32 = 3;

pub fn execute(cli: &Cli, args: &BuildArgs) -> Result<i32> {
    let store = config_store(cli)?;

    let color = cli
        .color
        .parse::<ColorChoice>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let json = args.message_format.as_deref() == Some("json");
    let shell = Shell::from_flags(cli.quiet, cli.verbose, color, json);

    // Paired --foo/--no-foo flags collapse to an optional override
    let servers = tri_state(args.servers, args.no_servers);
    let copy_folder = tri_state(args.copy_folder, args.no_copy_folder);

    let opts = RunOptions {
        platforms: args.platform.clone(),
        name: args.name.clone(),
        output_root: args.output_root.clone(),
        servers,
        copy_folder,
        development: args.development.then_some(true),
        no_stamp: args.no_stamp,
        emit_plan: args.plan,
        save_config: args.save,
    };

    let report = run_batch(&store, &opts, &shell)?;

    let code = match report.map(|r| r.overall) {
        None | Some(OverallOutcome::Succeeded) => 0,
        Some(OverallOutcome::Cancelled) => EXIT_CANCELLED,
        Some(OverallOutcome::Failed) | Some(OverallOutcome::PartialFailure) => 1,
    };
    Ok(code)
}

fn tri_state(yes: bool, no: bool) -> Option<bool> {
    if yes {
        Some(true)
    } else if no {
        Some(false)
    } else {
        None
    }
}
