//! Prompt templates per language.
//!
//! Templates carry `{{name}}` placeholders that [`render_template`] substitutes
//! before a request is issued. A [`PromptStore`] holds the active language's
//! templates and is handed explicitly to whichever component needs it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Interface language, which also selects the default prompt set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Persian
    Fa,
}

/// Kind of request a template drives.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PromptCategory {
    /// Idea to outline; `{{idea}}`
    StoryStructure,
    /// Scene to script; `{{sceneDescription}}`
    Script,
    /// Script to image prompt; `{{globalStylePrompt}}`, `{{script}}`
    ImagePrompt,
    /// Video request; `{{prompt}}`
    Video,
    /// Narration; `{{text}}`
    Tts,
    /// Music request; `{{prompt}}`
    Music,
    /// Scene rewrite; `{{text}}`
    Rewrite,
    /// Scene expansion; `{{text}}`
    Expand,
    /// Scene summary; `{{text}}`
    Shrink,
    /// Tone change; `{{tone}}`, `{{text}}`
    ChangeTone,
}

/// One template per [`PromptCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prompts(BTreeMap<PromptCategory, String>);

impl Prompts {
    /// Built-in templates for `language`.
    pub fn defaults(language: Language) -> Self {
        let entries = match language {
            Language::En => EN_DEFAULTS,
            Language::Fa => FA_DEFAULTS,
        };
        Self(
            entries
                .iter()
                .map(|(category, template)| (*category, (*template).to_string()))
                .collect(),
        )
    }

    /// Template for `category`.
    pub fn get(&self, category: PromptCategory) -> &str {
        self.0.get(&category).map(String::as_str).unwrap_or_default()
    }

    /// Replace one template.
    pub fn set(&mut self, category: PromptCategory, template: impl Into<String>) {
        self.0.insert(category, template.into());
    }

    /// Iterate templates in category order.
    pub fn iter(&self) -> impl Iterator<Item = (PromptCategory, &str)> {
        self.0.iter().map(|(category, template)| (*category, template.as_str()))
    }
}

/// Active language plus its (possibly edited) templates.
///
/// # Examples
///
/// ```
/// use vignette_core::{Language, PromptCategory, PromptStore, Prompts};
///
/// let mut store = PromptStore::new(Language::En);
/// store.update_prompt(PromptCategory::Tts, "Say: {{text}}");
/// assert_eq!(store.prompt(PromptCategory::Tts), "Say: {{text}}");
///
/// store.reset_prompts();
/// assert_eq!(store.prompts(), Prompts::defaults(Language::En));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStore {
    language: Language,
    prompts: Prompts,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl PromptStore {
    /// Start with the defaults for `language`.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            prompts: Prompts::defaults(language),
        }
    }

    /// Active language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language; edits made under the previous language are discarded.
    pub fn set_language(&mut self, language: Language) {
        debug!(from = %self.language, to = %language, "Switching prompt language");
        self.language = language;
        self.prompts = Prompts::defaults(language);
    }

    /// Overwrite the active template for `category`.
    pub fn update_prompt(&mut self, category: PromptCategory, value: impl Into<String>) {
        self.prompts.set(category, value);
    }

    /// Restore the active language's defaults.
    pub fn reset_prompts(&mut self) {
        self.prompts = Prompts::defaults(self.language);
    }

    /// Snapshot of the active templates.
    pub fn prompts(&self) -> Prompts {
        self.prompts.clone()
    }

    /// Active template for `category`.
    pub fn prompt(&self, category: PromptCategory) -> &str {
        self.prompts.get(category)
    }
}

/// Replace every `{{name}}` occurrence with its value.
///
/// Placeholders without a value are left as-is. Values are inserted verbatim.
///
/// # Examples
///
/// ```
/// use vignette_core::render_template;
///
/// let out = render_template("{{a}} and {{a}} then {{b}}", &[("a", "x"), ("b", "y")]);
/// assert_eq!(out, "x and x then y");
/// ```
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{{{name}}}}}", name = name), value)
        })
}

const EN_DEFAULTS: &[(PromptCategory, &str)] = &[
    (
        PromptCategory::StoryStructure,
        "Based on this idea: \"{{idea}}\", create a compelling story structure. Provide a title, a one-sentence logline, and break the story into 3 to 5 key scenes. For each scene, provide a short, descriptive paragraph outlining the key events.",
    ),
    (
        PromptCategory::Script,
        "Write a short script for the following scene. Focus on visual actions and key dialogue. Scene: \"{{sceneDescription}}\"",
    ),
    (
        PromptCategory::ImagePrompt,
        "Create a concise, highly descriptive image generation prompt in ENGLISH based on this script. Capture the mood, setting, main character, and key action in a single sentence. IMPORTANTLY, adhere to the following artistic style: \"{{globalStylePrompt}}\". Script: \"{{script}}\"",
    ),
    (
        PromptCategory::Video,
        "Animate this scene based on the following prompt: {{prompt}}",
    ),
    (
        PromptCategory::Tts,
        "Please read the following text aloud: {{text}}",
    ),
    (
        PromptCategory::Music,
        "Create a musical piece based on this prompt: {{prompt}}",
    ),
    (
        PromptCategory::Rewrite,
        "Rewrite the following scene description to be more engaging and vivid, but keep the core meaning the same. Scene: \"{{text}}\"",
    ),
    (
        PromptCategory::Expand,
        "Expand on the following scene description. Add more sensory details, character actions, and setting descriptions to make it about twice as long. Scene: \"{{text}}\"",
    ),
    (
        PromptCategory::Shrink,
        "Summarize the following scene description into one or two concise, impactful sentences. Scene: \"{{text}}\"",
    ),
    (
        PromptCategory::ChangeTone,
        "Rewrite the following scene description with a {{tone}} tone. Scene: \"{{text}}\"",
    ),
];

const FA_DEFAULTS: &[(PromptCategory, &str)] = &[
    (
        PromptCategory::StoryStructure,
        "بر اساس این ایده: «{{idea}}»، یک ساختار داستانی جذاب به زبان فارسی ایجاد کنید. کل خروجی، شامل عنوان، لاگ‌لاین و تمام توضیحات صحنه، باید به فارسی باشد. یک عنوان، یک لاگ‌لاین یک جمله‌ای ارائه دهید و داستان را به ۳ تا ۵ صحنه کلیدی تقسیم کنید. برای هر صحنه، یک پاراگراف توصیفی کوتاه بنویسید که رویدادهای اصلی را مشخص کند.",
    ),
    (
        PromptCategory::Script,
        "یک فیلمنامه کوتاه به زبان فارسی برای صحنه زیر بنویسید. بر روی اقدامات بصری و دیالوگ های کلیدی تمرکز کنید. صحنه: «{{sceneDescription}}»",
    ),
    (
        PromptCategory::ImagePrompt,
        "بر اساس این فیلمنامه فارسی، یک پرامپت (دستور) تولید تصویر بسیار توصیفی و کوتاه به زبان انگلیسی ایجاد کن. حال و هوا، محیط، شخصیت اصلی و اکشن کلیدی را در یک جمله خلاصه کن. بسیار مهم: به سبک هنری زیر پایبند باش: «{{globalStylePrompt}}». فیلمنامه: «{{script}}»",
    ),
    (
        PromptCategory::Video,
        "این صحنه را بر اساس دستور زیر متحرک کن: {{prompt}}",
    ),
    (
        PromptCategory::Tts,
        "لطفاً متن فارسی زیر را با صدای بلند بخوانید: {{text}}",
    ),
    (
        PromptCategory::Music,
        "یک قطعه موسیقی بر اساس این دستور بساز: {{prompt}}",
    ),
    (
        PromptCategory::Rewrite,
        "توضیحات صحنه زیر را به زبان فارسی بازنویسی کنید تا جذاب تر و واضح تر شود، اما معنای اصلی را حفظ کنید. صحنه: «{{text}}»",
    ),
    (
        PromptCategory::Expand,
        "توضیحات صحنه زیر را به زبان فارسی گسترش دهید. جزئیات حسی، اقدامات شخصیت و توصیفات محیطی بیشتری اضافه کنید تا طول آن تقریباً دو برابر شود. صحنه: «{{text}}»",
    ),
    (
        PromptCategory::Shrink,
        "توضیحات صحنه زیر را در یک یا دو جمله کوتاه و تأثیرگذار به زبان فارسی خلاصه کنید. صحنه: «{{text}}»",
    ),
    (
        PromptCategory::ChangeTone,
        "توضیحات صحنه زیر را با لحن {{tone}} به زبان فارسی بازنویسی کنید. صحنه: «{{text}}»",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_language_covers_every_category() {
        for language in Language::iter() {
            let prompts = Prompts::defaults(language);
            for category in PromptCategory::iter() {
                assert!(
                    !prompts.get(category).is_empty(),
                    "{language} is missing {category}"
                );
            }
        }
    }

    #[test]
    fn reset_restores_defaults_byte_for_byte() {
        let mut store = PromptStore::new(Language::Fa);
        for category in PromptCategory::iter() {
            store.update_prompt(category, "edited");
        }
        store.reset_prompts();
        for category in PromptCategory::iter() {
            assert_eq!(
                store.prompt(category).as_bytes(),
                Prompts::defaults(Language::Fa).get(category).as_bytes()
            );
        }
    }

    #[test]
    fn switching_language_discards_edits() {
        let mut store = PromptStore::new(Language::En);
        store.update_prompt(PromptCategory::Script, "custom");
        store.set_language(Language::Fa);
        assert_eq!(store.language(), Language::Fa);
        assert_eq!(store.prompts(), Prompts::defaults(Language::Fa));

        store.set_language(Language::En);
        assert_eq!(
            store.prompt(PromptCategory::Script),
            Prompts::defaults(Language::En).get(PromptCategory::Script)
        );
    }

    #[test]
    fn render_replaces_all_occurrences() {
        let out = render_template(
            "{{text}} / {{tone}} / {{text}} / {{missing}}",
            &[("text", "T"), ("tone", "dark")],
        );
        assert_eq!(out, "T / dark / T / {{missing}}");
    }

    #[test]
    fn render_inserts_values_verbatim() {
        let out = render_template(PromptCategory::Tts.default_en(), &[("text", "{{x}} \"quoted\"")]);
        assert_eq!(out, "Please read the following text aloud: {{x}} \"quoted\"");
    }

    #[test]
    fn category_wire_names_are_camel_case() {
        assert_eq!(PromptCategory::StoryStructure.to_string(), "storyStructure");
        assert_eq!(
            serde_json::to_string(&PromptCategory::ChangeTone).unwrap(),
            "\"changeTone\""
        );
    }

    impl PromptCategory {
        fn default_en(self) -> &'static str {
            EN_DEFAULTS
                .iter()
                .find(|(category, _)| *category == self)
                .map(|(_, template)| *template)
                .unwrap()
        }
    }
}
