use std::sync::Arc;

use crate::app::{AppContext, Result};
use crate::store::order::sorted_for_persist;
use crate::store::{self, Store};
use crate::sync::SyncReport;

/// Loads the mirror file, reconciles it with the remote feed and rewrites
/// the file when anything was stored.
pub async fn sync(ctx: &AppContext, force: bool) -> Result<SyncReport> {
    let output = &ctx.config.sync.output;
    let mirror = Arc::new(store::load(output)?);
    let before = mirror.item_count()?;

    println!(
        "Syncing minds of {} into {} ({} items known)...",
        ctx.config.sync.user_id,
        output.display(),
        before
    );

    let reconciler = ctx.reconciler(mirror.clone());
    let report = reconciler.reconcile(&ctx.config.sync.user_id, force).await?;

    if report.has_changes() {
        store::save(&*mirror, output)?;
    }

    println!(
        "{} items updated. ({} candidates, {} pages, {}ms)",
        report.updated,
        report.candidates,
        report.pages,
        report.elapsed().num_milliseconds()
    );

    if !report.failures.is_empty() {
        eprintln!("Failed to fetch {} items:", report.failures.len());
        for (id, error) in &report.failures {
            eprintln!("  {}: {}", id, error);
        }
    }

    if !report.empty_urls.is_empty() {
        println!("Following URLs empty:");
        for url in &report.empty_urls {
            println!(" {}", url);
        }
    }

    Ok(report)
}

/// Prints the mirrored items in file order.
pub fn list(ctx: &AppContext) -> Result<usize> {
    let mirror = store::load(&ctx.config.sync.output)?;
    let items = sorted_for_persist(mirror.all_items()?);

    if items.is_empty() {
        println!("No items");
        return Ok(0);
    }

    for item in &items {
        let marker = if item.is_complete() { " " } else { "?" };
        let remind = item
            .remind_of
            .as_deref()
            .map(|r| format!(" (remind of {})", r))
            .unwrap_or_default();
        println!("{} {}{}  {}", marker, item.id, remind, item.headline());
    }

    Ok(items.len())
}
