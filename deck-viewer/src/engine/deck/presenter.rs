use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::paths::DECK_MANIFEST_PATH;

use super::manifest::{
    DeckManifest, ImageSide, Slide, SlideKind, TextAlignment, VerticalAlignment,
};
use super::navigation::{SlideChanged, SlideIndex};
use crate::engine::fold::state_machine::FoldStateMachine;
use crate::engine::fold::systems::ToggleFold;
use crate::engine::loading::model_loader::PendingLoad;
use crate::engine::loading::progress::LoadProgress;
use crate::engine::session::viewer_session::ViewerRequest;

const TEXT_SLIDE_BACKGROUND: Color = Color::srgb(0.05, 0.05, 0.05);
const BUTTON_IDLE: Color = Color::srgba(1.0, 1.0, 1.0, 0.1);
const BUTTON_HOVER: Color = Color::srgba(1.0, 1.0, 1.0, 0.2);

#[derive(Resource, Default)]
pub struct DeckLoader {
    handle: Option<Handle<DeckManifest>>,
    presented: bool,
}

/// Root of the UI for the slide on screen.
#[derive(Component)]
pub struct SlideUi;

#[derive(Component)]
pub struct FoldButton;

#[derive(Component)]
pub struct FoldButtonLabel;

#[derive(Component)]
pub struct LoadingOverlay;

#[derive(Component)]
pub struct LoadingLabel;

pub fn start_loading_deck(mut loader: ResMut<DeckLoader>, asset_server: Res<AssetServer>) {
    info!("Loading deck from {DECK_MANIFEST_PATH}");
    loader.handle = Some(asset_server.load(DECK_MANIFEST_PATH));
}

/// Publish the deck once it parses and present its first slide.
pub fn load_deck_system(
    mut loader: ResMut<DeckLoader>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<DeckManifest>>,
    mut commands: Commands,
    mut changes: EventWriter<SlideChanged>,
) {
    if loader.presented {
        return;
    }
    let Some(handle) = loader.handle.clone() else {
        return;
    };
    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&handle) {
        error!("Failed to load deck {DECK_MANIFEST_PATH}: {err}");
        loader.presented = true;
        return;
    }
    let Some(deck) = manifests.get(&handle) else {
        return;
    };

    info!("Deck \"{}\" loaded: {} slides", deck.title, deck.len());
    commands.insert_resource(deck.clone());
    commands.insert_resource(SlideIndex::new(deck.len()));
    if !deck.is_empty() {
        changes.write(SlideChanged {
            index: 0,
            total: deck.len(),
        });
    }
    loader.presented = true;
}

/// Rebuild the slide UI and point the viewer at the new slide.
pub fn present_slide(
    mut changes: EventReader<SlideChanged>,
    deck: Option<Res<DeckManifest>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
    current_ui: Query<Entity, With<SlideUi>>,
    mut requests: EventWriter<ViewerRequest>,
) {
    let Some(change) = changes.read().last().copied() else {
        return;
    };
    let Some(slide) = deck.as_ref().and_then(|deck| deck.slide(change.index)) else {
        warn!("No slide at index {}", change.index);
        return;
    };

    for entity in &current_ui {
        commands.entity(entity).despawn();
    }
    spawn_slide_ui(&mut commands, &asset_server, slide);

    match slide.mount_request() {
        Some(request) => {
            requests.write(ViewerRequest::Mount(request));
        }
        None => {
            requests.write(ViewerRequest::Unmount);
        }
    }
}

/// Placement and colour shared by every text block on a slide.
struct TextStyle {
    colour: Color,
    justify: JustifyText,
    align_items: AlignItems,
    justify_content: JustifyContent,
}

impl TextStyle {
    fn for_slide(slide: &Slide) -> Self {
        let content = &slide.content;
        let (justify, align_items) = match content.text_alignment {
            TextAlignment::Left => (JustifyText::Left, AlignItems::FlexStart),
            TextAlignment::Center => (JustifyText::Center, AlignItems::Center),
            TextAlignment::Right => (JustifyText::Right, AlignItems::FlexEnd),
        };
        let justify_content = match content.vertical_alignment {
            VerticalAlignment::Top => JustifyContent::FlexStart,
            VerticalAlignment::Center => JustifyContent::Center,
            VerticalAlignment::Bottom => JustifyContent::FlexEnd,
        };
        Self {
            colour: slide.text_colour().unwrap_or(Color::WHITE),
            justify,
            align_items,
            justify_content,
        }
    }
}

/// One half of a two-column or text-and-image slide.
#[derive(Component)]
pub struct SlideColumn;

#[derive(Component)]
pub struct SlideImage;

fn spawn_slide_ui(commands: &mut Commands, asset_server: &AssetServer, slide: &Slide) {
    let content = &slide.content;
    let style = TextStyle::for_slide(slide);
    let background = if slide.is_model() {
        Color::NONE
    } else {
        TEXT_SLIDE_BACKGROUND
    };
    let image = slide.image_panel().map(|(image, side)| {
        let handle: Handle<Image> = asset_server.load(image.asset_path().to_owned());
        (handle, image.alt.clone(), side)
    });
    let two_columns = slide.kind == SlideKind::TwoColumnText;

    let stacked = [
        (content.eyebrow.as_deref(), 16.0),
        (Some(content.header.as_str()), 56.0),
        (content.body.as_deref(), 28.0),
        (content.supporting_text.as_deref(), 16.0),
    ];

    commands
        .spawn((
            SlideUi,
            Name::new(format!("slide {}", slide.id)),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: if image.is_some() || two_columns {
                    FlexDirection::Row
                } else {
                    FlexDirection::Column
                },
                align_items: style.align_items,
                justify_content: style.justify_content,
                row_gap: Val::Px(16.0),
                column_gap: Val::Px(64.0),
                padding: UiRect::all(Val::Px(64.0)),
                ..default()
            },
            BackgroundColor(background),
        ))
        .with_children(|root| {
            if let Some((handle, alt, side)) = image {
                let texts = [
                    (Some(content.header.as_str()), 48.0),
                    (content.body.as_deref(), 24.0),
                ];
                match side {
                    ImageSide::Left => {
                        spawn_image_panel(root, handle, alt);
                        spawn_column(root, &style, &texts);
                    }
                    ImageSide::Right => {
                        spawn_column(root, &style, &texts);
                        spawn_image_panel(root, handle, alt);
                    }
                }
            } else if two_columns {
                // Header on the left, supporting paragraphs on the right.
                let text = content
                    .supporting_text
                    .as_deref()
                    .or(content.body.as_deref())
                    .unwrap_or_default();
                let paragraphs: Vec<_> = text
                    .split("\n\n")
                    .map(|paragraph| (Some(paragraph), 20.0))
                    .collect();
                spawn_column(root, &style, &[(Some(content.header.as_str()), 64.0)]);
                spawn_column(root, &style, &paragraphs);
            } else {
                spawn_texts(root, &style, &stacked);
            }

            if slide.is_model() {
                spawn_fold_button(root);
                spawn_loading_overlay(root);
            }
        });
}

fn spawn_texts(parent: &mut ChildSpawnerCommands, style: &TextStyle, texts: &[(Option<&str>, f32)]) {
    for (text, size) in texts {
        let Some(text) = text.filter(|text| !text.is_empty()) else {
            continue;
        };
        parent.spawn((
            Text::new(text),
            TextFont {
                font_size: *size,
                ..default()
            },
            TextColor(style.colour),
            TextLayout::new_with_justify(style.justify),
        ));
    }
}

fn spawn_column(parent: &mut ChildSpawnerCommands, style: &TextStyle, texts: &[(Option<&str>, f32)]) {
    parent
        .spawn((
            SlideColumn,
            Node {
                flex_grow: 1.0,
                flex_basis: Val::Px(0.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: style.align_items,
                justify_content: style.justify_content,
                row_gap: Val::Px(16.0),
                ..default()
            },
        ))
        .with_children(|column| spawn_texts(column, style, texts));
}

fn spawn_image_panel(parent: &mut ChildSpawnerCommands, image: Handle<Image>, alt: String) {
    parent.spawn((
        SlideImage,
        Name::new(alt),
        ImageNode::new(image),
        Node {
            flex_grow: 1.0,
            flex_basis: Val::Px(0.0),
            height: Val::Percent(100.0),
            ..default()
        },
    ));
}

fn spawn_fold_button(root: &mut ChildSpawnerCommands) {
    root.spawn(Node {
        position_type: PositionType::Absolute,
        bottom: Val::Px(40.0),
        left: Val::Px(0.0),
        width: Val::Percent(100.0),
        justify_content: JustifyContent::Center,
        ..default()
    })
    .with_children(|row| {
        row.spawn((
            FoldButton,
            Button,
            Node {
                padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                ..default()
            },
            BorderRadius::all(Val::Px(4.0)),
            BackgroundColor(BUTTON_IDLE),
        ))
        .with_children(|button| {
            button.spawn((
                FoldButtonLabel,
                Text::new("FOLD"),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
    });
}

fn spawn_loading_overlay(root: &mut ChildSpawnerCommands) {
    root.spawn((
        LoadingOverlay,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        Visibility::Hidden,
    ))
    .with_children(|overlay| {
        overlay.spawn((
            LoadingLabel,
            Text::new("0%"),
            TextFont {
                font_size: 32.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
    });
}

pub fn fold_button_interaction(
    mut buttons: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<FoldButton>)>,
    mut toggles: EventWriter<ToggleFold>,
) {
    for (interaction, mut background) in &mut buttons {
        match interaction {
            Interaction::Pressed => {
                toggles.write(ToggleFold);
            }
            Interaction::Hovered => background.0 = BUTTON_HOVER,
            Interaction::None => background.0 = BUTTON_IDLE,
        }
    }
}

pub fn update_fold_button_label(
    machine: Res<FoldStateMachine>,
    mut labels: Query<&mut Text, With<FoldButtonLabel>>,
) {
    let label = machine.state().action_label();
    for mut text in &mut labels {
        if text.0 != label {
            text.0 = label.to_owned();
        }
    }
}

/// Show the overlay while a load is pending, with its progress.
pub fn update_loading_overlay(
    progress: Res<LoadProgress>,
    pending: Option<Res<PendingLoad>>,
    mut overlays: Query<&mut Visibility, With<LoadingOverlay>>,
    mut labels: Query<&mut Text, With<LoadingLabel>>,
) {
    let visible = pending.is_some();
    for mut visibility in &mut overlays {
        let wanted = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }

    let label = progress.label();
    for mut text in &mut labels {
        if text.0 != label {
            text.0.clone_from(&label);
        }
    }
}
