//! Per-recipe documentation pages.

use std::fmt::Write;

use super::{sentence, table_cell};
use crate::descriptor::{DataTableDescriptor, OptionDescriptor, RecipeDescriptor};
use crate::license::License;
use crate::origin::Origin;
use crate::recipe_path::RecipePaths;

/// Everything a recipe page shows besides the descriptor itself.
pub struct PageContext<'a> {
    pub origin: &'a Origin,
    /// Composite recipes listing this one, from the containment index.
    pub used_by: &'a [&'a RecipeDescriptor],
    pub paths: &'a RecipePaths,
}

pub fn render(recipe: &RecipeDescriptor, ctx: &PageContext<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", recipe.display_name_escaped());
    let _ = writeln!(out, "**{}**\n", recipe.name);

    let description = sentence(&recipe.description);
    if !description.is_empty() {
        let _ = writeln!(out, "_{}._\n", description);
    }

    write_tags(&mut out, recipe);
    write_source(&mut out, recipe, ctx.origin);
    write_options(&mut out, &recipe.options);
    write_data_tables(&mut out, recipe);
    write_definition(&mut out, recipe, ctx.paths);
    write_examples(&mut out, recipe);
    write_used_by(&mut out, ctx);
    write_contributors(&mut out, recipe);

    out.push_str("## License\n\n");
    let _ = writeln!(
        out,
        "This recipe is available under the {} license.",
        ctx.origin.license.markdown()
    );
    out
}

fn write_tags(out: &mut String, recipe: &RecipeDescriptor) {
    if recipe.tags.is_empty() {
        return;
    }
    out.push_str("### Tags\n\n");
    for tag in &recipe.tags {
        let _ = writeln!(out, "* {}", tag);
    }
    out.push('\n');
}

fn write_source(out: &mut String, recipe: &RecipeDescriptor, origin: &Origin) {
    out.push_str("## Recipe source\n\n");
    if origin.is_from_core_library() {
        let _ = writeln!(
            out,
            "[GitHub]({}), [Issue Tracker]({}), [Maven Central](https://central.sonatype.com/artifact/{}/{}/{}/jar)\n",
            origin.github_url(),
            origin.issue_tracker_url(),
            origin.group_id,
            origin.artifact_id,
            origin.version
        );
    } else if !origin.repository_url.is_empty() {
        let _ = writeln!(
            out,
            "[GitHub]({}), [Issue Tracker]({})\n",
            origin.repository_url,
            origin.issue_tracker_url()
        );
    } else {
        let _ = writeln!(out, "`{}`\n", recipe.source);
    }

    let _ = writeln!(out, "* groupId: `{}`", origin.group_id);
    let _ = writeln!(out, "* artifactId: `{}`", origin.artifact_id);
    let _ = writeln!(out, "* version: `{}`\n", origin.version);

    if origin.license != License::Unknown {
        let _ = writeln!(
            out,
            "This recipe is available in the {} licensed module `{}:{}`.\n",
            origin.license.markdown(),
            origin.group_id,
            origin.artifact_id
        );
    }
}

fn write_options(out: &mut String, options: &[OptionDescriptor]) {
    if options.is_empty() {
        return;
    }
    out.push_str("## Options\n\n");
    out.push_str("| Type | Name | Description | Example |\n");
    out.push_str("| -- | -- | -- | -- |\n");
    for option in options {
        let required = if option.required { "" } else { " (optional)" };
        let example = option
            .example
            .as_deref()
            .map(|e| format!(" `{}` ", table_cell(e)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "| `{}` | {} | {}{} |{}|",
            table_cell(&option.option_type),
            option.name,
            table_cell(&option.description),
            required,
            example
        );
    }
    out.push('\n');
}

/// Tables every run produces, listed ahead of a recipe's own tables.
const RUN_TABLES: &[(&str, &str, &str, &[(&str, &str)])] = &[
    (
        "Source files that had results",
        "org.openrewrite.table.SourcesFileResults",
        "Source files that were modified by the recipe run.",
        &[
            ("Source path before the run", "The source path of the file before the run. `null` when a source file was created during the run."),
            ("Source path after the run", "A recipe may modify the source path. This is the path after the run. `null` when a source file was deleted during the run."),
            ("Parent of the recipe that made changes", "In a hierarchical recipe, the parent of the recipe that made a change. Empty if this is the root of a hierarchy or if the recipe is not hierarchical at all."),
            ("Recipe that made changes", "The specific recipe that made a change."),
            ("Estimated time saving", "An estimated effort that a developer to fix manually instead of using this recipe, in unit of seconds."),
            ("Cycle", "The recipe cycle in which the change was made."),
        ],
    ),
    (
        "Source files that errored on a recipe",
        "org.openrewrite.table.SourcesFileErrors",
        "The details of all errors produced by a recipe run.",
        &[
            ("Source path", "The file that failed to parse."),
            ("Recipe that made changes", "The specific recipe that made a change."),
            ("Stack trace", "The stack trace of the failure."),
        ],
    ),
];

fn write_data_tables(out: &mut String, recipe: &RecipeDescriptor) {
    let own: Vec<&DataTableDescriptor> = recipe.own_data_tables().collect();
    if own.is_empty() {
        return;
    }
    out.push_str("## Data Tables

");
    for (display_name, name, description, columns) in RUN_TABLES {
        write_table_header(out, display_name, name, description);
        for (column, text) in columns.iter() {
            let _ = writeln!(out, "| {} | {} |", column, text);
        }
        out.push('\n');
    }
    for table in own {
        write_table_header(out, &table.display_name, &table.name, &table.description);
        for column in &table.columns {
            let _ = writeln!(
                out,
                "| {} | {} |",
                table_cell(&column.display_name),
                table_cell(&column.description)
            );
        }
        out.push('\n');
    }
}

fn write_table_header(out: &mut String, display_name: &str, name: &str, description: &str) {
    let _ = writeln!(out, "### {}\n**{}**\n", display_name, name);
    if !description.is_empty() {
        let _ = writeln!(out, "_{}_\n", description);
    }
    out.push_str("| Column Name | Description |\n");
    out.push_str("| ----------- | ----------- |\n");
}

fn write_definition(out: &mut String, recipe: &RecipeDescriptor, paths: &RecipePaths) {
    if !recipe.is_composite() {
        return;
    }
    out.push_str("## Definition\n\n");
    for child in &recipe.recipe_list {
        let _ = writeln!(
            out,
            "* [{}](/recipes/{})",
            child.display_name_escaped(),
            paths.path(&child.name)
        );
        for option in child.options.iter().filter(|o| o.value.is_some()) {
            if let Some(value) = &option.value {
                let _ = writeln!(out, "  * {}: `{}`", option.name, display_value(value));
            }
        }
    }
    out.push('\n');
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => format!(
            "[{}]",
            items.iter().map(display_value).collect::<Vec<_>>().join(",")
        ),
        other => other.to_string(),
    }
}

fn write_examples(out: &mut String, recipe: &RecipeDescriptor) {
    if recipe.examples.is_empty() {
        return;
    }
    out.push_str("## Examples\n");
    for (idx, example) in recipe.examples.iter().enumerate() {
        let _ = writeln!(out, "##### Example {}\n", idx + 1);
        if !example.description.is_empty() {
            let _ = writeln!(out, "{}\n", example.description);
        }
        for source in &example.sources {
            let _ = writeln!(out, "###### Before\n```{}\n{}\n```\n", source.language, source.before);
            if let Some(after) = &source.after {
                let _ = writeln!(out, "###### After\n```{}\n{}\n```\n", source.language, after);
            }
        }
    }
}

fn write_used_by(out: &mut String, ctx: &PageContext<'_>) {
    if ctx.used_by.is_empty() {
        return;
    }
    out.push_str("## Used by\n\n");
    out.push_str("This recipe is used as part of the following composite recipes:\n\n");
    for parent in ctx.used_by {
        let _ = writeln!(
            out,
            "* [{}](/recipes/{})",
            parent.display_name_escaped(),
            ctx.paths.path(&parent.name)
        );
    }
    out.push('\n');
}

fn write_contributors(out: &mut String, recipe: &RecipeDescriptor) {
    if recipe.contributors.is_empty() {
        return;
    }
    let names: Vec<String> = recipe
        .contributors
        .iter()
        .map(|c| {
            if c.email.is_empty() || c.email.contains("noreply") {
                c.name.clone()
            } else {
                format!("[{}](mailto:{})", c.name, c.email)
            }
        })
        .collect();
    let _ = writeln!(out, "## Contributors\n{}\n", names.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ColumnDescriptor, Contributor};
    use url::Url;

    fn origin() -> Origin {
        Origin::new(
            "org.openrewrite.recipe",
            "rewrite-spring",
            "5.1.0",
            Url::parse("file:///repo/rewrite-spring").unwrap(),
        )
    }

    #[test]
    fn test_page_sections() {
        let mut recipe = RecipeDescriptor::named("org.openrewrite.java.spring.ChangeProperty");
        recipe.display_name = "Change <property>".to_string();
        recipe.description = "Changes a property key.".to_string();
        recipe.options = vec![OptionDescriptor {
            name: "key".to_string(),
            option_type: "String".to_string(),
            description: "The key | path".to_string(),
            example: Some("server.port".to_string()),
            required: true,
            ..Default::default()
        }];
        recipe.contributors = vec![
            Contributor {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                line_count: 3,
            },
            Contributor {
                name: "Bot".to_string(),
                email: "bot@users.noreply.github.com".to_string(),
                line_count: 1,
            },
        ];
        let parent = RecipeDescriptor {
            display_name: "Spring bundle".to_string(),
            ..RecipeDescriptor::named("org.openrewrite.java.spring.Bundle")
        };
        let used_by = [&parent];
        let paths = RecipePaths::default();
        let origin = origin();
        let page = render(
            &recipe,
            &PageContext {
                origin: &origin,
                used_by: &used_by,
                paths: &paths,
            },
        );

        assert!(page.starts_with("# Change &lt;property&gt;\n\n**org.openrewrite.java.spring.ChangeProperty**\n"));
        assert!(page.contains("_Changes a property key._"));
        assert!(page.contains("| `String` | key | The key \\| path | `server.port` |"));
        assert!(page.contains("* [Spring bundle](/recipes/java/spring/bundle)"));
        assert!(page.contains("## Contributors\n[Ada](mailto:ada@example.com), Bot"));
        assert!(page.contains("[License Unknown]"));
    }

    #[test]
    fn test_definition_lists_configured_values() {
        let mut child = RecipeDescriptor::named("org.openrewrite.java.ChangeType");
        child.options = vec![OptionDescriptor {
            name: "newFullyQualifiedTypeName".to_string(),
            value: Some(serde_json::json!("java.util.List")),
            ..Default::default()
        }];
        let mut recipe = RecipeDescriptor::named("org.openrewrite.java.Migrate");
        recipe.recipe_list = vec![child];
        let paths = RecipePaths::default();
        let origin = origin();
        let page = render(
            &recipe,
            &PageContext {
                origin: &origin,
                used_by: &[],
                paths: &paths,
            },
        );
        assert!(page.contains("## Definition\n\n* [org.openrewrite.java.ChangeType](/recipes/java/changetype)\n  * newFullyQualifiedTypeName: `java.util.List`\n"));
        assert!(!page.contains("## Used by"));
    }

    #[test]
    fn test_data_tables_only_for_recipe_specific_tables() {
        let mut recipe = RecipeDescriptor::named("org.openrewrite.java.search.FindMethods");
        recipe.data_tables = vec![DataTableDescriptor {
            name: "org.openrewrite.table.RecipeRunStats".to_string(),
            display_name: "Recipe performance".to_string(),
            ..Default::default()
        }];
        let paths = RecipePaths::default();
        let origin = origin();
        let ctx = PageContext {
            origin: &origin,
            used_by: &[],
            paths: &paths,
        };
        assert!(!render(&recipe, &ctx).contains("## Data Tables"));

        recipe.data_tables.push(DataTableDescriptor {
            name: "org.openrewrite.java.table.MethodCalls".to_string(),
            display_name: "Method calls".to_string(),
            description: "The text of matching method invocations.".to_string(),
            columns: vec![ColumnDescriptor {
                name: "method".to_string(),
                column_type: "String".to_string(),
                display_name: "Method call".to_string(),
                description: "The text of the method call.".to_string(),
            }],
        });
        let page = render(&recipe, &ctx);
        assert!(page.contains("## Data Tables\n\n### Source files that had results\n**org.openrewrite.table.SourcesFileResults**\n"));
        assert!(page.contains(
            "### Method calls\n**org.openrewrite.java.table.MethodCalls**\n\n_The text of matching method invocations._\n\n| Column Name | Description |\n| ----------- | ----------- |\n| Method call | The text of the method call. |\n"
        ));
        assert!(!page.contains("Recipe performance"));
    }
}
