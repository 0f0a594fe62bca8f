use bevy::input::gestures::PinchGesture;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::input::touch::Touches;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::camera::Viewport;
use bevy::window::PrimaryWindow;
use constants::render_settings::*;

use super::orbit::OrbitControls;
use super::viewport::letterbox;

/// Wheel pixels per zoom step, for trackpads reporting pixel deltas.
const PIXELS_PER_SCROLL_LINE: f32 = 100.0;

/// Root of everything the viewer adds to the scene besides the case itself.
#[derive(Component)]
pub struct SceneRig;

#[derive(Component)]
pub struct RigCamera;

/// Spawn camera, lights and ground under one root. Despawning the root
/// tears the whole rig down.
pub fn spawn_rig(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    let ground_mesh = meshes.add(Plane3d::default().mesh().size(GROUND_PLANE_SIZE, GROUND_PLANE_SIZE));
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.0, 0.0, 0.0, GROUND_SHADOW_OPACITY),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 1.0,
        ..default()
    });

    commands
        .spawn((
            SceneRig,
            Name::new("scene rig"),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|rig| {
            rig.spawn((
                RigCamera,
                Camera3d::default(),
                Camera {
                    order: 0,
                    ..default()
                },
                Projection::from(PerspectiveProjection {
                    fov: CAMERA_FOV_DEGREES.to_radians(),
                    near: CAMERA_NEAR,
                    far: CAMERA_FAR,
                    ..default()
                }),
                Transform::from_translation(INITIAL_CAMERA_POSITION)
                    .looking_at(INITIAL_CONTROLS_TARGET, Vec3::Y),
                OrbitControls::new(INITIAL_CONTROLS_TARGET),
            ));

            rig.spawn((
                DirectionalLight {
                    illuminance: KEY_LIGHT_ILLUMINANCE,
                    shadows_enabled: true,
                    ..default()
                },
                Transform::from_translation(KEY_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
            ));

            rig.spawn((
                DirectionalLight {
                    illuminance: FILL_LIGHT_ILLUMINANCE,
                    shadows_enabled: false,
                    ..default()
                },
                Transform::from_translation(FILL_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
            ));

            rig.spawn((
                Mesh3d(ground_mesh),
                MeshMaterial3d(ground_material),
                Transform::from_xyz(0.0, GROUND_PLANE_HEIGHT, 0.0),
                NotShadowCaster,
            ));
        })
        .id()
}

/// Keep the rig camera on the largest centred 16:9 area of the window.
pub fn fit_rig_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<&mut Camera, With<RigCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let (offset, size) = letterbox(window.physical_size());
    if size.x == 0 || size.y == 0 {
        return;
    }

    for mut camera in &mut cameras {
        let current = camera
            .viewport
            .as_ref()
            .map(|viewport| (viewport.physical_position, viewport.physical_size));
        if current == Some((offset, size)) {
            continue;
        }
        debug!("Rig viewport {}x{} at {}", size.x, size.y, offset);
        camera.viewport = Some(Viewport {
            physical_position: offset,
            physical_size: size,
            ..default()
        });
    }
}

/// Feed pointer, wheel and touch input into the orbit controls.
pub fn orbit_input_system(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    mut pinch_events: EventReader<PinchGesture>,
    touches: Res<Touches>,
    mut cameras: Query<(&Camera, &mut OrbitControls), With<RigCamera>>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();

    let mut scroll_steps = 0.0;
    for event in scroll_events.read() {
        scroll_steps += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_SCROLL_LINE,
        };
    }

    let pinch: f32 = pinch_events.read().map(|gesture| gesture.0).sum();

    let active: Vec<_> = touches.iter().collect();

    for (camera, mut controls) in &mut cameras {
        let height = camera
            .logical_viewport_size()
            .map(|size| size.y)
            .unwrap_or_default();

        if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
            controls.rotate_by_drag(mouse_delta, height);
        }

        if scroll_steps != 0.0 {
            controls.zoom(scroll_steps);
        }

        if pinch != 0.0 {
            controls.pinch(1.0 + pinch);
        }

        match active.as_slice() {
            [finger] => controls.rotate_by_drag(finger.delta(), height),
            [first, second] => {
                let before = first.previous_position().distance(second.previous_position());
                let now = first.position().distance(second.position());
                if before > 0.0 {
                    controls.pinch(now / before);
                }
            }
            _ => {}
        }
    }
}

pub fn update_orbit_controls(
    mut cameras: Query<(&mut Transform, &mut OrbitControls), With<RigCamera>>,
) {
    for (mut transform, mut controls) in &mut cameras {
        let position = controls.update(transform.translation);
        if position != transform.translation {
            transform.translation = position;
        }
    }
}

/// Point the rig camera at the orbit target. Runs after anything that moves
/// either of them.
pub fn aim_rig_camera(mut cameras: Query<(&mut Transform, &OrbitControls), With<RigCamera>>) {
    for (mut transform, controls) in &mut cameras {
        if transform.translation != controls.target {
            transform.look_at(controls.target, Vec3::Y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aim_faces_the_orbit_target() {
        let mut app = App::new();
        app.add_systems(Update, (update_orbit_controls, aim_rig_camera).chain());
        let camera = app
            .world_mut()
            .spawn((
                RigCamera,
                Transform::from_xyz(0.0, 0.0, 6.0),
                OrbitControls::new(Vec3::new(0.0, 1.0, 0.0)),
            ))
            .id();
        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        let expected = (Vec3::new(0.0, 1.0, 0.0) - transform.translation).normalize();
        assert!(transform.forward().dot(expected) > 0.9999);
    }

    #[test]
    fn settled_controls_leave_the_camera_in_place() {
        let mut app = App::new();
        app.add_systems(Update, update_orbit_controls);
        let camera = app
            .world_mut()
            .spawn((
                RigCamera,
                Transform::from_translation(INITIAL_CAMERA_POSITION),
                OrbitControls::new(INITIAL_CONTROLS_TARGET),
            ))
            .id();
        app.update();
        app.update();

        let transform = app.world().get::<Transform>(camera).unwrap();
        assert_eq!(transform.translation, INITIAL_CAMERA_POSITION);
    }
}
