//! Get command - fetch an asset's payload

use crate::asset::Cfs;
use crate::cli::args::GetArgs;
use crate::error::{CfsError, CfsResult};
use tokio::io::AsyncWriteExt;

/// Execute the get command
pub async fn execute(args: GetArgs, cfs: &Cfs) -> CfsResult<()> {
    let asset = cfs.load_asset(&args.asset).await?;
    asset.settled().await?;

    let payload = asset
        .payload()
        .ok_or_else(|| CfsError::not_found(asset.path(), asset.version()))?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, payload.bytes())
                .await
                .map_err(|e| CfsError::io(format!("writing {}", path.display()), e))?;
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(payload.bytes())
                .await
                .map_err(|e| CfsError::io("writing payload to stdout", e))?;
            stdout
                .flush()
                .await
                .map_err(|e| CfsError::io("flushing stdout", e))?;
        }
    }

    Ok(())
}
