use heck::{ToPascalCase, ToSnakeCase};

use crate::ir::NormalizedName;

/// Placeholder for names with no alphanumeric character at all.
const UNNAMED: &str = "unnamed";

/// Compute the casings a document name is generated under.
///
/// Punctuation (`/`, `.`, `{`, `-` and the like) separates words; the words
/// themselves are split further on case changes.
pub fn normalize_name(name: &str) -> NormalizedName {
    let words = join_words(name);
    NormalizedName {
        original: name.to_string(),
        pascal_case: words.to_pascal_case(),
        snake_case: words.to_snake_case(),
    }
}

fn join_words(name: &str) -> String {
    let words: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        UNNAMED.to_string()
    } else {
        words.join("_")
    }
}
