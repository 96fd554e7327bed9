//! Global image style presets.

/// Named style appended to every image prompt on a storyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StylePreset {
    /// Preset name
    pub name: &'static str,
    /// Style text inserted as `{{globalStylePrompt}}`
    pub prompt: &'static str,
}

/// Built-in presets; the first is the default.
pub const STYLE_PRESETS: [StylePreset; 4] = [
    StylePreset {
        name: "cinematic",
        prompt: "cinematic, 8k, photorealistic, dramatic lighting, epic composition",
    },
    StylePreset {
        name: "anime",
        prompt: "anime style, key visual, vibrant colors, detailed background, by Makoto Shinkai",
    },
    StylePreset {
        name: "claymation",
        prompt: "claymation style, stop-motion, detailed textures, miniature set, by Aardman Animations",
    },
    StylePreset {
        name: "vintage comic",
        prompt: "vintage comic book art, halftone dots, bold lines, limited color palette, 1960s style",
    },
];

impl StylePreset {
    /// Look up a preset by name, ignoring case and `-`/`_` separators.
    pub fn find(name: &str) -> Option<StylePreset> {
        let wanted = normalize(name);
        STYLE_PRESETS
            .iter()
            .copied()
            .find(|preset| normalize(preset.name) == wanted)
    }
}

impl Default for StylePreset {
    fn default() -> Self {
        STYLE_PRESETS[0]
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(['-', '_'], " ")
}
