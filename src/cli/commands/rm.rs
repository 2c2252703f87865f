//! Rm command - remove one version of an asset

use crate::asset::Cfs;
use crate::cli::args::RmArgs;
use crate::error::CfsResult;
use console::style;

/// Execute the rm command
pub async fn execute(args: RmArgs, cfs: &Cfs) -> CfsResult<()> {
    let asset = cfs.load_asset(&args.asset).await?;

    // An expired entry is already purged by its load
    if let Err(e) = asset.settled().await {
        if e.is_expired() {
            println!("{} {} (expired)", style("Removed").yellow(), args.asset);
            return Ok(());
        }
    }

    let version = asset.remove().await?;
    println!(
        "{} {} (version {})",
        style("Removed").green(),
        asset.path(),
        version
    );
    Ok(())
}
