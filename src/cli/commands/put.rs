//! Put command - store a file as an asset

use crate::asset::Cfs;
use crate::blob::Blob;
use crate::cli::args::PutArgs;
use crate::error::CfsResult;
use console::style;
use tracing::debug;

/// Execute the put command
pub async fn execute(args: PutArgs, cfs: &Cfs) -> CfsResult<()> {
    let payload = Blob::from_file(&args.file, args.mime.as_deref()).await?;
    debug!(
        "Read {} bytes ({}) from {}",
        payload.size(),
        payload.mime_type(),
        args.file.display()
    );

    let asset = cfs.create_asset(&args.asset, payload)?;

    // With auto-save the write is already in flight
    asset.settled().await?;
    if !cfs.config().auto_save {
        asset.save().await?;
    }

    println!(
        "{} {} (version {}, {} bytes)",
        style("Stored").green(),
        asset.path(),
        asset.version(),
        asset.size().unwrap_or_default()
    );
    Ok(())
}
