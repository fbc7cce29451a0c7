//! Phase 3: Attribution
//!
//! Ties every aggregated descriptor to exactly one origin and collapses the
//! concatenated aggregation output into a [`Catalog`] that is unique by
//! recipe name.
//!
//! Attribution is strict. A descriptor whose source locator matches no origin,
//! or a name contributed by two different origins, aborts the run: rendering a
//! page with the wrong provenance is worse than rendering nothing.

use std::collections::{BTreeMap, HashSet};

use log::debug;
use url::Url;

use super::{Catalog, RecipeLoadResult};
use crate::error::{Error, Result};
use crate::origin::{Origin, OriginMap};

const SEARCH_SCHEME_SUFFIX: &str = "-search";

/// Resolve the origin that produced a descriptor from its source locator.
///
/// Handles the three locator shapes the aggregator produces:
/// `<ecosystem>-search://<artifact>/<recipe>` for remote recipes,
/// `[jar:]<origin>!/<inner path>` for recipes declared inside an origin, and
/// the bare origin location.
pub fn find_origin<'a>(source_uri: &str, origins: &'a OriginMap) -> Option<&'a Origin> {
    if let Some((scheme, rest)) = source_uri.split_once("://") {
        if scheme.ends_with(SEARCH_SCHEME_SUFFIX) {
            let artifact = rest.split('/').next().unwrap_or(rest);
            return origins.values().find(|o| o.artifact_id == artifact);
        }
    }

    let stripped = source_uri.strip_prefix("jar:").unwrap_or(source_uri);
    let base = match stripped.find('!') {
        Some(idx) => &stripped[..idx],
        None => stripped,
    };
    let location = Url::parse(base).ok()?;
    origins.get(&location)
}

/// Executes Phase 3 of the pipeline.
pub fn execute(load: RecipeLoadResult) -> Result<Catalog> {
    let RecipeLoadResult {
        recipes,
        categories,
        instances,
        recipe_to_source,
        origins,
    } = load;

    let mut recipe_origins: BTreeMap<String, Url> = BTreeMap::new();
    let mut unique = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let source = if recipe.source.is_empty() {
            recipe_to_source
                .get(&recipe.name)
                .cloned()
                .unwrap_or_default()
        } else {
            recipe.source.clone()
        };
        let origin = find_origin(&source, &origins).ok_or_else(|| Error::UnresolvedOrigin {
            recipe: recipe.name.clone(),
            source_uri: source.clone(),
        })?;

        if let Some(existing) = recipe_origins.get(&recipe.name) {
            if existing != &origin.location {
                let first = origins
                    .get(existing)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| existing.to_string());
                return Err(Error::DuplicateRecipe {
                    name: recipe.name.clone(),
                    first,
                    second: origin.to_string(),
                });
            }
            debug!("Collapsing repeated descriptor {} from {}", recipe.name, origin);
            continue;
        }
        recipe_origins.insert(recipe.name.clone(), origin.location.clone());
        unique.push(recipe);
    }

    let mut seen_categories = HashSet::new();
    let categories = categories
        .into_iter()
        .filter(|c| seen_categories.insert(c.package_name.clone()))
        .collect();

    let mut seen_instances = HashSet::new();
    let instances = instances
        .into_iter()
        .filter(|i| seen_instances.insert(i.name.clone()))
        .collect();

    Ok(Catalog {
        recipes: unique,
        categories,
        instances,
        recipe_origins,
        origins,
    })
}
