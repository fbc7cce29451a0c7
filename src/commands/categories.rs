//! # Categories Command Implementation
//!
//! This module implements the `categories` subcommand, which displays the
//! category tree the documentation would be laid out in.
//!
//! ## Functionality
//!
//! - **Category Tree Visualization**: Displays the category hierarchy with
//!   the number of recipes below each node
//! - **Depth Control**: Supports `--depth` flag to limit tree depth
//! - **Subtrees**: Supports `--root` to show one category only
//!
//! This command is a safe, read-only operation that does not modify any files.
//! It runs phases 1-4 of the pipeline without diffing or writing.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};

use super::SourceArgs;
use recipe_docs::output::{emoji, OutputConfig};
use recipe_docs::phases::categories::Category;
use recipe_docs::phases::orchestrator::{self, Collaborators};
use recipe_docs::suggestions;

/// Display the category tree of the aggregated recipes
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum depth to display in the tree.
    ///
    /// If not specified, displays the full tree.
    /// Use 0 to show only the top-level categories.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,

    /// Show only the category at this path, e.g. `java/spring`.
    #[arg(long, value_name = "PATH")]
    pub root: Option<String>,
}

/// Execute the `categories` command.
pub fn execute(args: CategoriesArgs, output: &OutputConfig) -> Result<()> {
    let config = args.source.load_config()?;
    let sources = args.source.sources()?;

    let catalog = orchestrator::load_catalog(&config, &sources, Collaborators::default())
        .map_err(suggestions::pipeline_failed)?;
    let (_, roots) = orchestrator::categorize(&config, &catalog);

    let tree = select(&roots, args.root.as_deref(), args.depth.unwrap_or(usize::MAX))?;

    println!(
        "{} Categories of {} recipes",
        emoji(output, "🌳", "[TREE]"),
        catalog.recipes.len()
    );
    print_tree(&tree).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}

/// The tree to print: one category when `root` is given, else every
/// top-level category under a synthetic root.
fn select(roots: &[Category], root: Option<&str>, max_depth: usize) -> Result<TreeNode> {
    match root {
        Some(path) => {
            let path = path.trim_matches('/');
            let category = roots
                .iter()
                .find_map(|c| c.find(path))
                .ok_or_else(|| {
                    let mut candidates = Vec::new();
                    collect_paths(roots, &mut candidates);
                    suggestions::unknown_category(path, &candidates)
                })?;
            Ok(build_tree_node(category, max_depth, 0))
        }
        None => {
            let count = roots.iter().map(Category::recipe_count).sum::<usize>();
            Ok(TreeNode {
                label: format!("recipes ({})", count),
                children: roots
                    .iter()
                    .map(|c| build_tree_node(c, max_depth, 0))
                    .collect(),
            })
        }
    }
}

fn collect_paths<'a>(categories: &'a [Category], paths: &mut Vec<&'a str>) {
    for category in categories {
        paths.push(category.path.as_str());
        collect_paths(&category.children, paths);
    }
}

/// Build a tree node from a category
fn build_tree_node(category: &Category, max_depth: usize, current_depth: usize) -> TreeNode {
    let label = format!(
        "{} ({}) [{}]",
        category.display_name(),
        category.path,
        category.recipe_count()
    );

    if current_depth >= max_depth || category.children.is_empty() {
        TreeNode {
            label,
            children: vec![],
        }
    } else {
        let children = category
            .children
            .iter()
            .map(|child| build_tree_node(child, max_depth, current_depth + 1))
            .collect();
        TreeNode { label, children }
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
