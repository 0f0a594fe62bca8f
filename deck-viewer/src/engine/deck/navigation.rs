use bevy::prelude::*;

use crate::engine::fold::systems::ToggleFold;

/// Current position in the deck. Moves are bounded; there is no wrap-around.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlideIndex {
    current: usize,
    total: usize,
}

impl SlideIndex {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    /// Jump to `index` if it exists. Returns whether the slide changed.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total || index == self.current {
            return false;
        }
        self.current = index;
        true
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideCommand {
    Next,
    Previous,
    GoTo(usize),
}

/// The presented slide changed, including the first slide on deck load.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChanged {
    pub index: usize,
    pub total: usize,
}

/// Arrow keys and space move through the deck; `F` folds the case.
pub fn keyboard_navigation(
    keys: Res<ButtonInput<KeyCode>>,
    mut slide_commands: EventWriter<SlideCommand>,
    mut toggles: EventWriter<ToggleFold>,
) {
    if keys.any_just_pressed([KeyCode::ArrowRight, KeyCode::Space]) {
        slide_commands.write(SlideCommand::Next);
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        slide_commands.write(SlideCommand::Previous);
    }
    if keys.just_pressed(KeyCode::KeyF) {
        toggles.write(ToggleFold);
    }
}

pub fn apply_slide_commands(
    mut slide_commands: EventReader<SlideCommand>,
    mut index: ResMut<SlideIndex>,
    mut changes: EventWriter<SlideChanged>,
) {
    for command in slide_commands.read() {
        let moved = match command {
            SlideCommand::Next => index.next(),
            SlideCommand::Previous => index.previous(),
            SlideCommand::GoTo(target) => index.go_to(*target),
        };
        if moved {
            info!("Slide {}/{}", index.current() + 1, index.total());
            changes.write(SlideChanged {
                index: index.current(),
                total: index.total(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_are_bounded() {
        let mut index = SlideIndex::new(3);
        assert!(!index.previous());
        assert!(index.next());
        assert!(index.next());
        assert!(!index.next());
        assert_eq!(index.current(), 2);
        assert!(!index.go_to(3));
        assert!(index.go_to(0));
        assert!(!index.go_to(0));
    }

    #[test]
    fn empty_deck_never_moves() {
        let mut index = SlideIndex::new(0);
        assert!(!index.next());
        assert!(!index.go_to(0));
    }

    fn navigation_app(total: usize) -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(SlideIndex::new(total))
            .add_event::<SlideCommand>()
            .add_event::<SlideChanged>()
            .add_event::<ToggleFold>()
            .init_resource::<Seen>()
            .add_systems(
                Update,
                (keyboard_navigation, apply_slide_commands, record_changes).chain(),
            );
        app
    }

    #[derive(Resource, Default)]
    struct Seen(Vec<usize>);

    fn record_changes(mut changes: EventReader<SlideChanged>, mut seen: ResMut<Seen>) {
        seen.0.extend(changes.read().map(|change| change.index));
    }

    fn press(app: &mut App, key: KeyCode) {
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release_all();
        keys.clear();
        keys.press(key);
    }

    #[test]
    fn keys_drive_the_deck() {
        let mut app = navigation_app(8);

        press(&mut app, KeyCode::ArrowRight);
        app.update();
        press(&mut app, KeyCode::Space);
        app.update();
        assert_eq!(app.world().resource::<SlideIndex>().current(), 2);

        press(&mut app, KeyCode::ArrowLeft);
        app.update();
        assert_eq!(app.world().resource::<SlideIndex>().current(), 1);

        assert_eq!(app.world().resource::<Seen>().0, vec![1, 2, 1]);
    }

    #[test]
    fn f_requests_a_fold() {
        let mut app = navigation_app(2);
        press(&mut app, KeyCode::KeyF);
        app.update();
        assert_eq!(app.world().resource::<Events<ToggleFold>>().len(), 1);
        assert_eq!(app.world().resource::<SlideIndex>().current(), 0);
    }
}
