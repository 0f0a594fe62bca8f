use bevy::prelude::*;

/// Coarse phase of the case viewer.
///
/// `Loading` only covers the first load after a mount; a texture change on a
/// running viewer keeps the old case on screen and stays `Running`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ViewerPhase {
    #[default]
    Idle,
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;

pub fn log_phase_transitions(mut transitions: EventReader<StateTransitionEvent<ViewerPhase>>) {
    for transition in transitions.read() {
        if let (Some(from), Some(to)) = (transition.exited, transition.entered) {
            if from != to {
                info!("→ Viewer phase {from:?} -> {to:?}");
            }
        }
    }
}
