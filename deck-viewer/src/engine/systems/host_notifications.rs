use bevy::prelude::*;
use serde_json::json;

use crate::engine::deck::navigation::SlideChanged;
use crate::engine::fold::systems::FoldStateChanged;
use crate::engine::loading::model_loader::AssetLoadFailed;
use crate::engine::loading::progress::LoadProgressChanged;
use crate::rpc::web_rpc::WebRpcInterface;

/// Push viewer and deck events to the host page as JSON-RPC notifications.
pub fn forward_host_notifications(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut progress: EventReader<LoadProgressChanged>,
    mut fold_changes: EventReader<FoldStateChanged>,
    mut failures: EventReader<AssetLoadFailed>,
    mut slides: EventReader<SlideChanged>,
) {
    for event in progress.read() {
        rpc_interface.send_notification(
            "loading_progress",
            json!({
                "generation": event.generation,
                "percent": event.percent,
            }),
        );
    }

    for event in fold_changes.read() {
        rpc_interface.send_notification(
            "fold_state_changed",
            json!({
                "state": event.state.as_str(),
                "action": event.state.action_label(),
            }),
        );
    }

    for event in failures.read() {
        rpc_interface.send_notification(
            "asset_load_failed",
            json!({
                "generation": event.generation,
                "path": event.error.path(),
                "message": event.error.to_string(),
            }),
        );
    }

    for event in slides.read() {
        rpc_interface.send_notification(
            "slide_changed",
            json!({
                "index": event.index,
                "total": event.total,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fold::state_machine::FoldState;
    use crate::engine::loading::error::AssetLoadError;

    fn notification_app() -> App {
        let mut app = App::new();
        app.init_resource::<WebRpcInterface>()
            .add_event::<LoadProgressChanged>()
            .add_event::<FoldStateChanged>()
            .add_event::<AssetLoadFailed>()
            .add_event::<SlideChanged>()
            .add_systems(Update, forward_host_notifications);
        app
    }

    #[test]
    fn events_become_notifications() {
        let mut app = notification_app();
        let world = app.world_mut();
        world.send_event(LoadProgressChanged {
            generation: 3,
            percent: 50.0,
        });
        world.send_event(FoldStateChanged {
            state: FoldState::Folding,
        });
        world.send_event(AssetLoadFailed {
            generation: 3,
            error: AssetLoadError::Texture {
                path: "missing.png".into(),
                reason: "not found".into(),
            },
        });
        world.send_event(SlideChanged { index: 2, total: 8 });
        app.update();

        let rpc = app.world().resource::<WebRpcInterface>();
        let methods: Vec<_> = rpc
            .pending_notifications()
            .iter()
            .map(|notification| notification.method.as_str())
            .collect();
        assert_eq!(
            methods,
            [
                "loading_progress",
                "fold_state_changed",
                "asset_load_failed",
                "slide_changed"
            ]
        );

        let fold = &rpc.pending_notifications()[1];
        assert_eq!(fold.params["state"], "folding");
        assert_eq!(fold.params["action"], "UNFOLD");
        assert_eq!(rpc.pending_notifications()[2].params["path"], "missing.png");
    }
}
