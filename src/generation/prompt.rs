//! Prompt templates for the image studio's generation kinds and styles.

const QUALITY_SUFFIX: &str = ", masterpiece, best quality, high resolution, 8k";
const NO_STYLE: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationKind {
    #[default]
    Standard,
    AnimationStory,
    Character,
    Comic,
    Storyboard,
    Logo,
    Sticker,
    Pixel,
    Portrait,
    Isometric,
    Tattoo,
    Interior,
}

impl GenerationKind {
    pub const ALL: [GenerationKind; 12] = [
        Self::Standard,
        Self::AnimationStory,
        Self::Character,
        Self::Comic,
        Self::Storyboard,
        Self::Logo,
        Self::Sticker,
        Self::Pixel,
        Self::Portrait,
        Self::Isometric,
        Self::Tattoo,
        Self::Interior,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Standard => "DEFAULT",
            Self::AnimationStory => "ANIMATION_STORY",
            Self::Character => "CHARACTER",
            Self::Comic => "COMIC",
            Self::Storyboard => "STORYBOARD",
            Self::Logo => "LOGO",
            Self::Sticker => "STICKER",
            Self::Pixel => "PIXEL",
            Self::Portrait => "PORTRAIT",
            Self::Isometric => "ISOMETRIC",
            Self::Tattoo => "TATTOO",
            Self::Interior => "INTERIOR",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::AnimationStory => "Story w/ Cast",
            Self::Character => "Character Sheet",
            Self::Comic => "Manga/Comic",
            Self::Storyboard => "Storyboard",
            Self::Logo => "Logo Design",
            Self::Sticker => "Sticker",
            Self::Pixel => "Pixel Art",
            Self::Portrait => "Pro Portrait",
            Self::Isometric => "Isometric 3D",
            Self::Tattoo => "Tattoo",
            Self::Interior => "Interior",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Standard => "Default image generation",
            Self::AnimationStory => "Define characters and generate a story scene",
            Self::Character => "Three-view design (Front, Side, Back)",
            Self::Comic => "Comic page layout with panels",
            Self::Storyboard => "Cinematic sequence frames",
            Self::Logo => "Minimalist vector logo",
            Self::Sticker => "Die-cut sticker with white border",
            Self::Pixel => "Retro 16-bit game art",
            Self::Portrait => "Studio photography headshot",
            Self::Isometric => "3D Game asset view",
            Self::Tattoo => "Black & white line art stencil",
            Self::Interior => "Interior design visualization",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id))
    }
}

pub const STYLES: [&str; 12] = [
    NO_STYLE,
    "Photorealistic",
    "Anime",
    "Cyberpunk",
    "Watercolor",
    "3D Render",
    "Oil Painting",
    "Pencil Sketch",
    "Pixel Art",
    "Claymation",
    "Cinematic",
    "Retro Wave",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMember {
    pub name: String,
    pub description: String,
}

impl CastMember {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Starting cast for a story when none was given.
    pub fn default_cast() -> Vec<CastMember> {
        vec![
            Self::new(
                "Hero",
                "A young adventurer with messy blue hair and a red scarf",
            ),
            Self::new(
                "Villain",
                "A shadowy figure in obsidian armor with glowing green eyes",
            ),
        ]
    }
}

/// The prompt sent to the service and the shorter one kept in history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub final_prompt: String,
    pub display_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptSpec {
    pub prompt: String,
    pub kind: GenerationKind,
    pub style: Option<String>,
    pub cast: Vec<CastMember>,
}

impl PromptSpec {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    fn style(&self) -> Option<&str> {
        self.style
            .as_deref()
            .map(str::trim)
            .filter(|style| !style.is_empty() && *style != NO_STYLE)
    }

    pub fn compose(&self) -> ComposedPrompt {
        let prompt = self.prompt.as_str();
        let style_suffix = self
            .style()
            .map(|style| format!(", {style} art style"))
            .unwrap_or_default();
        let style = style_suffix.as_str();
        let quality = QUALITY_SUFFIX;

        let final_prompt = match self.kind {
            GenerationKind::Standard => format!("{prompt}{style}{quality}"),
            GenerationKind::AnimationStory => {
                let defaults;
                let members = if self.cast.is_empty() {
                    defaults = CastMember::default_cast();
                    &defaults
                } else {
                    &self.cast
                };
                let cast = members
                    .iter()
                    .map(|member| format!("- {}: {}", member.name, member.description))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "Animation Storyboard Sequence.\n\nCAST OF CHARACTERS:\n{cast}\n\n\
                     SCENE DESCRIPTION:\n{prompt}\n\nINSTRUCTIONS:\n\
                     Create a coherent storyboard sheet showing this scene. \
                     Ensure the characters match their descriptions perfectly. \
                     Use dynamic camera angles and expressive poses.{style}{quality}"
                )
            }
            GenerationKind::Character => format!(
                "Detailed character design sheet of: {prompt}. Include three views: front view, \
                 side view, and back view. Consistent character details, neutral background, \
                 concept art{style}{quality}"
            ),
            GenerationKind::Comic => format!(
                "Manga/Comic book page layout featuring: {prompt}. Dynamic paneling, speech \
                 bubbles, dramatic angles, visual storytelling, black and white or \
                 colored{style}{quality}"
            ),
            GenerationKind::Storyboard => format!(
                "Professional movie storyboard sheet layout: {prompt}. Sequential panels, \
                 cinematic lighting, camera directions, rough sketch aesthetic{style}"
            ),
            GenerationKind::Logo => format!(
                "Professional vector logo design of: {prompt}. Minimalist, flat design, vector \
                 graphics, simple shapes, white background, high contrast, brand \
                 identity{style}"
            ),
            GenerationKind::Sticker => format!(
                "Die-cut sticker design of: {prompt}. White contour border, vector illustration \
                 style, isolated on white background, simple colors, cute{style}"
            ),
            GenerationKind::Pixel => format!(
                "Pixel art of: {prompt}. 16-bit retro game style, crisp pixels, sprite sheet or \
                 scene, vibrant colors{style}"
            ),
            GenerationKind::Portrait => format!(
                "High-end editorial studio portrait photography of: {prompt}. 85mm lens, f/1.8, \
                 sharp focus on eyes, dramatic lighting, skin texture, photorealistic, bokeh \
                 background{style}{quality}"
            ),
            GenerationKind::Isometric => format!(
                "Isometric 3D view of: {prompt}. Diorama style, unreal engine 5 render, cute, \
                 low poly or high detail depending on style, isolated on neutral \
                 background{style}"
            ),
            GenerationKind::Tattoo => format!(
                "Tattoo stencil design of: {prompt}. Black and white line art, clean lines, high \
                 contrast, isolated on white background, ink style{style}"
            ),
            GenerationKind::Interior => format!(
                "Professional interior design photography of: {prompt}. Architectural Digest \
                 style, modern luxury, perfect lighting, wide angle, photorealistic, 8k{style}"
            ),
        };

        let display_prompt = match (self.kind, self.style()) {
            (GenerationKind::Standard, Some(style)) => format!("[{style}] {prompt}"),
            (GenerationKind::Standard, None) => prompt.to_string(),
            (kind, _) => format!("[{}] {prompt}", kind.label()),
        };

        ComposedPrompt {
            final_prompt,
            display_prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_prompt_appends_style_and_quality() {
        let mut template = PromptSpec::new("a fox in snow");
        template.style = Some("Watercolor".to_string());
        let composed = template.compose();
        assert_eq!(
            composed.final_prompt,
            "a fox in snow, Watercolor art style, masterpiece, best quality, high resolution, 8k"
        );
        assert_eq!(composed.display_prompt, "[Watercolor] a fox in snow");
    }

    #[test]
    fn no_style_is_treated_as_absent() {
        let mut template = PromptSpec::new("a fox");
        template.style = Some("None".to_string());
        let composed = template.compose();
        assert_eq!(composed.display_prompt, "a fox");
        assert!(!composed.final_prompt.contains("art style"));
    }

    #[test]
    fn non_standard_kinds_label_display_prompt_with_kind() {
        let mut template = PromptSpec::new("coffee brand");
        template.kind = GenerationKind::Logo;
        template.style = Some("Anime".to_string());
        let composed = template.compose();
        assert_eq!(composed.display_prompt, "[Logo Design] coffee brand");
        assert!(composed
            .final_prompt
            .starts_with("Professional vector logo design of: coffee brand."));
        assert!(composed.final_prompt.ends_with("brand identity, Anime art style"));
        assert!(!composed.final_prompt.contains("masterpiece"));
    }

    #[test]
    fn story_kind_embeds_cast_list() {
        let mut template = PromptSpec::new("they meet on a bridge");
        template.kind = GenerationKind::AnimationStory;
        template.cast = vec![
            CastMember::new("Hero", "messy blue hair"),
            CastMember::new("Villain", "obsidian armor"),
        ];
        let composed = template.compose();
        assert!(composed
            .final_prompt
            .contains("CAST OF CHARACTERS:\n- Hero: messy blue hair\n- Villain: obsidian armor\n"));
        assert!(composed
            .final_prompt
            .contains("SCENE DESCRIPTION:\nthey meet on a bridge\n"));
        assert_eq!(
            composed.display_prompt,
            "[Story w/ Cast] they meet on a bridge"
        );
    }

    #[test]
    fn story_without_cast_uses_the_default_pair() {
        let mut template = PromptSpec::new("a duel at dawn");
        template.kind = GenerationKind::AnimationStory;
        let composed = template.compose();
        assert!(composed.final_prompt.contains(
            "CAST OF CHARACTERS:\n\
             - Hero: A young adventurer with messy blue hair and a red scarf\n\
             - Villain: A shadowy figure in obsidian armor with glowing green eyes\n"
        ));
        assert!(!composed.final_prompt.contains("CAST OF CHARACTERS:\n\n"));
    }

    #[test]
    fn kinds_resolve_from_ids() {
        for kind in GenerationKind::ALL {
            assert_eq!(GenerationKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(GenerationKind::from_id("logo"), Some(GenerationKind::Logo));
        assert_eq!(GenerationKind::from_id("poster"), None);
    }
}
