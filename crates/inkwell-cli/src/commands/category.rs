//! Category command handlers

use anyhow::Result;

use inkwell_core::{catalog, KeyValueStore, Synchronizer};

use crate::output::Output;

/// List the category catalog with post counts
pub fn list<S: KeyValueStore>(posts: &Synchronizer<S>, output: &Output) -> Result<()> {
    let categories: Vec<_> = catalog::categories()
        .into_iter()
        .map(|category| {
            let count = posts.by_category(&category.id).count();
            (category, count)
        })
        .collect();

    output.print_categories(&categories);
    Ok(())
}
