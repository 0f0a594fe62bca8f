use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::camera::rig::{
    aim_rig_camera, fit_rig_viewport, orbit_input_system, update_orbit_controls,
};
use crate::engine::core::app_state::{ViewerPhase, log_phase_transitions};
use crate::engine::core::window_config::create_window_config;
use crate::engine::deck::manifest::DeckManifest;
use crate::engine::deck::navigation::{
    SlideChanged, SlideCommand, SlideIndex, apply_slide_commands, keyboard_navigation,
};
use crate::engine::deck::presenter::{
    DeckLoader, fold_button_interaction, load_deck_system, present_slide, start_loading_deck,
    update_fold_button_label, update_loading_overlay,
};
use crate::engine::fold::state_machine::FoldStateMachine;
use crate::engine::fold::systems::{
    FoldStateChanged, ToggleFold, advance_animations, handle_toggle_requests, settle_fold,
    sync_case_transforms,
};
use crate::engine::fold::tween::AnimationScheduler;
use crate::engine::loading::model_loader::{AssetLoadFailed, track_load_progress};
use crate::engine::loading::progress::{LoadProgress, LoadProgressChanged};
use crate::engine::materials::graded_material::GradedMaterial;
use crate::engine::session::controller::{
    attach_ready_asset, handle_viewer_requests, record_load_failures,
};
use crate::engine::session::viewer_session::{ViewerRequest, ViewerSession};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::host_notifications::forward_host_notifications;
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};

/// Letterbox colour around the 16:9 viewport.
const BACKDROP_COLOUR: Color = Color::srgb(0.05, 0.05, 0.05);

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<ViewerPhase>()
        .add_plugins(MaterialPlugin::<GradedMaterial>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers DeckManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<DeckManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(BACKDROP_COLOUR));

    app.init_resource::<ViewerSession>()
        .init_resource::<AnimationScheduler>()
        .init_resource::<FoldStateMachine>()
        .init_resource::<LoadProgress>()
        .init_resource::<DeckLoader>()
        .add_event::<ViewerRequest>()
        .add_event::<ToggleFold>()
        .add_event::<FoldStateChanged>()
        .add_event::<LoadProgressChanged>()
        .add_event::<AssetLoadFailed>()
        .add_event::<SlideCommand>()
        .add_event::<SlideChanged>();

    app.add_systems(Startup, (setup, start_loading_deck).chain());

    // Deck and slide UI.
    app.add_systems(
        Update,
        (
            load_deck_system,
            keyboard_navigation,
            apply_slide_commands.run_if(resource_exists::<SlideIndex>),
            present_slide,
            fold_button_interaction,
        )
            .chain()
            .before(handle_viewer_requests),
    );

    // Viewer lifecycle and loading.
    app.add_systems(
        Update,
        (
            handle_viewer_requests,
            track_load_progress,
            record_load_failures,
            attach_ready_asset,
        )
            .chain(),
    );

    // Interaction and fold animation, once a case can be on screen.
    app.add_systems(
        Update,
        (
            fit_rig_viewport,
            orbit_input_system,
            update_orbit_controls,
            handle_toggle_requests,
            advance_animations,
            settle_fold,
            aim_rig_camera,
            sync_case_transforms,
        )
            .chain()
            .after(attach_ready_asset)
            .run_if(not(in_state(ViewerPhase::Idle))),
    );

    app.add_systems(
        Update,
        (
            update_fold_button_label,
            update_loading_overlay,
            forward_host_notifications,
            fps_notification_system,
            log_phase_transitions,
        )
            .after(settle_fold),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

/// Backdrop camera clearing the whole window, and the UI camera drawn over
/// the letterboxed 3D viewport.
fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("backdrop camera"),
        Camera2d,
        Camera {
            order: -1,
            ..default()
        },
    ));

    commands.spawn((
        Name::new("ui camera"),
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        IsDefaultUiCamera,
    ));

    #[cfg(not(target_arch = "wasm32"))]
    {
        spawn_fps_overlay(&mut commands);
    }
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
