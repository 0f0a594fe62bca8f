use bevy::prelude::*;
use constants::paths::DEFAULT_CASE_TEXTURE;
use serde::{Deserialize, Serialize};

use crate::engine::materials::colour_grade::ColourGrade;
use crate::engine::session::viewer_session::MountRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Layout family of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideKind {
    Cover,
    #[serde(rename = "cover-2")]
    Cover2,
    TextOnly,
    TextImageRight,
    TextImageLeft,
    TwoColumnText,
    Model,
    Custom,
}

/// Text and media for one slide. Every field except the header is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(default)]
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyebrow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporting_text: Option<String>,
    #[serde(default)]
    pub text_alignment: TextAlignment,
    #[serde(default)]
    pub vertical_alignment: VerticalAlignment,
    /// Case artwork for model slides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour_grade: Option<ColourGrade>,
    /// Hex colour such as `#d8bb53`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    pub src: String,
    pub alt: String,
}

impl ImageContent {
    pub fn asset_path(&self) -> &str {
        self.src.trim_start_matches('/')
    }
}

/// Side of a text-and-image slide the image panel sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SlideKind,
    #[serde(default)]
    pub content: SlideContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageContent>,
}

impl Slide {
    pub fn is_model(&self) -> bool {
        self.kind == SlideKind::Model
    }

    /// What the viewer should show for this slide, if it is a model slide.
    /// Paths are asset-relative, so a leading `/` is dropped.
    pub fn mount_request(&self) -> Option<MountRequest> {
        if !self.is_model() {
            return None;
        }
        let texture_path = self
            .content
            .texture_path
            .as_deref()
            .map(|path| path.trim_start_matches('/'))
            .filter(|path| !path.is_empty())
            .unwrap_or(DEFAULT_CASE_TEXTURE);

        Some(MountRequest {
            texture_path: texture_path.to_owned(),
            colour_grade: self.content.colour_grade.unwrap_or_default(),
        })
    }

    /// Image panel for text-and-image slides. Other kinds ignore `image`.
    pub fn image_panel(&self) -> Option<(&ImageContent, ImageSide)> {
        let side = match self.kind {
            SlideKind::TextImageLeft => ImageSide::Left,
            SlideKind::TextImageRight => ImageSide::Right,
            _ => return None,
        };
        self.image.as_ref().map(|image| (image, side))
    }

    pub fn text_colour(&self) -> Option<Color> {
        let hex = self.content.custom_text_color.as_deref()?;
        Srgba::hex(hex).ok().map(Color::from)
    }
}

/// The deck as a Bevy asset, loaded from JSON.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckManifest {
    pub title: String,
    pub slides: Vec<Slide>,
}

impl DeckManifest {
    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = r##"{
        "title": "Case Designs",
        "slides": [
            {
                "id": "1",
                "type": "cover",
                "content": { "body": "Case Designs Round 01" }
            },
            {
                "id": "2",
                "type": "model",
                "content": { "texture_path": "/caseTexture_03.png" }
            },
            {
                "id": "3",
                "type": "model",
                "content": {
                    "colour_grade": { "saturation": 0.0 }
                }
            },
            {
                "id": "4",
                "type": "cover-2",
                "content": {
                    "header": "Thank You.",
                    "custom_text_color": "#d8bb53",
                    "text_alignment": "left"
                }
            }
        ]
    }"##;

    fn deck() -> DeckManifest {
        serde_json::from_str(DECK).unwrap()
    }

    #[test]
    fn parses_slide_kinds_and_defaults() {
        let deck = deck();
        assert_eq!(deck.len(), 4);
        assert_eq!(deck.slides[0].kind, SlideKind::Cover);
        assert_eq!(deck.slides[0].content.header, "");
        assert_eq!(deck.slides[0].content.text_alignment, TextAlignment::Center);
        assert_eq!(deck.slides[3].kind, SlideKind::Cover2);
        assert_eq!(deck.slides[3].content.text_alignment, TextAlignment::Left);
    }

    #[test]
    fn model_slides_produce_mount_requests() {
        let deck = deck();
        assert_eq!(deck.slides[0].mount_request(), None);

        let request = deck.slides[1].mount_request().unwrap();
        assert_eq!(request.texture_path, "caseTexture_03.png");
        assert!(request.colour_grade.is_neutral());

        let fallback = deck.slides[2].mount_request().unwrap();
        assert_eq!(fallback.texture_path, DEFAULT_CASE_TEXTURE);
        assert_eq!(fallback.colour_grade.saturation, 0.0);
        assert_eq!(fallback.colour_grade.brightness, 1.0);
    }

    #[test]
    fn custom_text_colour_is_parsed() {
        let deck = deck();
        assert_eq!(
            deck.slides[3].text_colour(),
            Some(Color::from(Srgba::rgb_u8(0xd8, 0xbb, 0x53)))
        );
        assert_eq!(deck.slides[1].text_colour(), None);
    }

    #[test]
    fn image_panel_follows_the_slide_kind() {
        let left: Slide = serde_json::from_str(
            r#"{
                "id": "5",
                "type": "text-image-left",
                "content": { "header": "Process" },
                "image": { "src": "/images/process.png", "alt": "Process" }
            }"#,
        )
        .unwrap();
        let (image, side) = left.image_panel().unwrap();
        assert_eq!(side, ImageSide::Left);
        assert_eq!(image.asset_path(), "images/process.png");

        let cover = Slide {
            kind: SlideKind::Cover,
            ..left.clone()
        };
        assert_eq!(cover.image_panel(), None);

        let missing = Slide {
            kind: SlideKind::TextImageRight,
            image: None,
            ..left
        };
        assert_eq!(missing.image_panel(), None);
    }

    #[test]
    fn unknown_slide_kind_is_rejected() {
        let result = serde_json::from_str::<Slide>(r#"{"id": "x", "type": "video"}"#);
        assert!(result.is_err());
    }
}
