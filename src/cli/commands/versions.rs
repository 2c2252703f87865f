//! Versions command - list stored versions of a path

use crate::asset::{Cfs, StoredMetadata};
use crate::cli::args::{OutputFormat, VersionsArgs};
use crate::error::CfsResult;
use console::style;

/// Execute the versions command
pub async fn execute(args: VersionsArgs, cfs: &Cfs) -> CfsResult<()> {
    let versions = cfs.versions(&args.path).await?;

    if versions.is_empty() {
        if let OutputFormat::Json = args.format {
            println!("[]");
        } else {
            println!("No versions stored for {}.", args.path);
        }
        return Ok(());
    }

    let mut rows = Vec::with_capacity(versions.len());
    for version in versions {
        let metadata = cfs.metadata(&args.path, &version).await?;
        rows.push((version, metadata));
    }

    match args.format {
        OutputFormat::Table => print_table(cfs, &rows),
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Plain => print_plain(&rows),
    }

    Ok(())
}

fn print_table(cfs: &Cfs, rows: &[(String, Option<StoredMetadata>)]) {
    println!("{:<20} {:<30} {:<20} {:<8}", "VERSION", "NAME", "UPDATED", "STATE");
    println!("{}", "-".repeat(80));

    let now = chrono::Utc::now();
    for (version, metadata) in rows {
        let (name, updated, state) = match metadata {
            Some(m) => {
                let state = if cfs.config().is_expired(m.last_update, now) {
                    style("expired").yellow().to_string()
                } else {
                    style("fresh").green().to_string()
                };
                (
                    m.name.clone(),
                    m.last_update.format("%Y-%m-%d %H:%M").to_string(),
                    state,
                )
            }
            // Index lists a version whose metadata is gone
            None => ("-".to_string(), "-".to_string(), style("orphan").red().to_string()),
        };

        println!("{:<20} {:<30} {:<20} {:<8}", version, name, updated, state);
    }

    println!();
    println!("Total: {} version(s)", rows.len());
}

fn print_json(rows: &[(String, Option<StoredMetadata>)]) -> CfsResult<()> {
    #[derive(serde::Serialize)]
    struct VersionJson {
        version: String,
        name: Option<String>,
        last_update: Option<String>,
    }

    let json_rows: Vec<VersionJson> = rows
        .iter()
        .map(|(version, metadata)| VersionJson {
            version: version.clone(),
            name: metadata.as_ref().map(|m| m.name.clone()),
            last_update: metadata.as_ref().map(|m| m.last_update.to_rfc3339()),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json_rows)?);
    Ok(())
}

fn print_plain(rows: &[(String, Option<StoredMetadata>)]) {
    for (version, _) in rows {
        println!("{}", version);
    }
}
