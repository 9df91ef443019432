//! `multibuild platforms` command

use anyhow::Result;

use multibuild::core::platform::PlatformId;

use crate::cli::PlatformsArgs;

pub fn execute(args: &PlatformsArgs) -> Result<()> {
    if args.json {
        let entries: Vec<serde_json::Value> = PlatformId::supported()
            .iter()
            .map(|p| {
                serde_json::json!({
                    "platform": p.to_string(),
                    "extension": p.artifact_extension().expect("supported set"),
                    "output_dir": p.output_dir_name(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for platform in PlatformId::supported() {
        let ext = platform.artifact_extension().expect("supported set");
        println!("{:<10} .{:<8} {}", platform, ext, platform.output_dir_name());
    }

    Ok(())
}
