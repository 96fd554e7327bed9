//! Prompts command handler.

use vignette::{Language, PromptCategory, PromptStore};

/// Print `language`'s default templates, or just one category.
pub fn print_prompts(language: Language, category: Option<PromptCategory>) {
    let store = PromptStore::new(language);
    match category {
        Some(category) => println!("{}", store.prompt(category)),
        None => {
            for (category, template) in store.prompts().iter() {
                println!("[{}]\n{}\n", category, template);
            }
        }
    }
}
