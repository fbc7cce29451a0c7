//! Category index pages (`README.md` per category node).

use std::fmt::Write;

use crate::phases::categories::Category;
use crate::recipe_path::{RecipePaths, CORE_CATEGORY};

/// Title line of a category page.
///
/// Documentation sites misread a bare `C#` heading, and `Ai` only looks
/// right upper-cased.
pub fn title(category: &Category) -> String {
    match category.display_name().as_str() {
        "C#" => "`C#`".to_string(),
        "Ai" => "AI".to_string(),
        other => other.to_string(),
    }
}

/// Render the index page of one category.
pub fn render(category: &Category, paths: &RecipePaths) -> String {
    if category.path == CORE_CATEGORY {
        return render_core(category, paths);
    }

    let mut out = String::new();
    let _ = writeln!(out, "# {}", title(category));

    let description = category.description();
    if !description.is_empty() {
        out.push('\n');
        if description.contains('\n') || description.contains('_') {
            let _ = writeln!(out, "{}", description);
        } else {
            let _ = writeln!(out, "_{}_", description);
        }
    }
    out.push('\n');

    if !category.children.is_empty() {
        out.push_str("## Categories\n\n");
        for child in &category.children {
            let _ = writeln!(out, "* [{}](/recipes/{})", child.display_name(), child.path);
        }
        out.push('\n');
    }

    let composite: Vec<_> = category.composite_recipes().collect();
    if !composite.is_empty() {
        out.push_str("## Composite Recipes\n\n");
        out.push_str(
            "_Recipes that include further recipes, often including the individual recipes below._\n\n",
        );
        for recipe in composite {
            let _ = writeln!(
                out,
                "* [{}](./{}.md)",
                recipe.display_name_escaped(),
                category.file_name_of(&recipe.name, paths)
            );
        }
        out.push('\n');
    }

    let normal: Vec<_> = category.normal_recipes().collect();
    if !normal.is_empty() {
        out.push_str("## Recipes\n\n");
        for recipe in normal {
            let _ = writeln!(
                out,
                "* [{}](./{}.md)",
                recipe.display_name_escaped(),
                category.file_name_of(&recipe.name, paths)
            );
        }
        out.push('\n');
    }
    out
}

/// The reserved node for recipes without a category of their own.
fn render_core(category: &Category, paths: &RecipePaths) -> String {
    let mut out = String::from("# Core Recipes\n\n");
    out.push_str("_Recipes broadly applicable to all types of source files._\n\n");
    if !category.children.is_empty() {
        out.push_str("## Categories\n\n");
        for child in &category.children {
            let _ = writeln!(out, "* [{}](/recipes/{})", child.display_name(), child.path);
        }
        out.push('\n');
    }
    out.push_str("## Recipes\n\n");
    for recipe in &category.recipes {
        let _ = writeln!(
            out,
            "* [{}](./{}.md)",
            recipe.display_name_escaped(),
            category.file_name_of(&recipe.name, paths)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CategoryDescriptor, RecipeDescriptor};
    use std::collections::BTreeMap;

    fn category(path: &str, display: &str, description: &str) -> Category {
        Category {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            descriptor: Some(CategoryDescriptor {
                display_name: display.to_string(),
                description: description.to_string(),
                ..Default::default()
            }),
            recipes: Vec::new(),
            children: Vec::new(),
            local_file_names: BTreeMap::new(),
        }
    }

    #[test]
    fn test_special_titles() {
        assert_eq!(title(&category("csharp", "`C#`", "")), "`C#`");
        assert_eq!(title(&category("ai", "Ai", "")), "AI");
        assert_eq!(title(&category("java", "Java", "")), "Java");
    }

    #[test]
    fn test_description_with_markdown_is_not_emphasized() {
        let page = render(&category("java", "Java", "Uses snake_case names"), &RecipePaths::default());
        assert!(page.contains("\nUses snake_case names\n"));
        let page = render(&category("java", "Java", "Basic recipes"), &RecipePaths::default());
        assert!(page.contains("\n_Basic recipes_\n"));
    }

    #[test]
    fn test_core_page() {
        let mut core = category(CORE_CATEGORY, "", "");
        core.descriptor = None;
        core.recipes = vec![RecipeDescriptor {
            display_name: "Find files".to_string(),
            ..RecipeDescriptor::named("org.openrewrite.FindSourceFiles")
        }];
        let page = render(&core, &RecipePaths::default());
        assert!(page.starts_with("# Core Recipes\n"));
        assert!(page.contains("* [Find files](./findsourcefiles.md)"));
    }
}
