use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            (reset_and_read_input, manage_input_context, publish_pointer_events).chain(),
        );
    }
}

/// The single point where hardware input becomes game actions.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    context: Res<InputContext>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    match *context {
        InputContext::Disabled => {}

        InputContext::Gameplay => {
            input.open_calendar = keys.just_pressed(bindings.open_calendar);
            input.sleep = keys.just_pressed(bindings.sleep);
        }

        InputContext::Menu => {
            input.toggle_quest_board = keys.just_pressed(bindings.toggle_quest_board);
            input.cycle_mode = keys.just_pressed(bindings.cycle_mode);
            // The calendar key closes the billboard it opened.
            input.ui_cancel = keys.just_pressed(bindings.ui_cancel)
                || keys.just_pressed(bindings.open_calendar);
        }
    }
}

/// Derives InputContext from GameState. ONE system, replaces all per-domain guards.
fn manage_input_context(
    game_state: Res<State<GameState>>,
    mut context: ResMut<InputContext>,
) {
    *context = match *game_state.get() {
        GameState::Loading => InputContext::Disabled,
        GameState::Playing => InputContext::Gameplay,
        GameState::Billboard => InputContext::Menu,
    };
}

/// Republishes cursor motion and presses as pointer events in logical window pixels.
fn publish_pointer_events(
    mut cursor_moves: EventReader<CursorMoved>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut moved: EventWriter<PointerMoved>,
    mut pressed: EventWriter<PointerPressed>,
) {
    for cursor in cursor_moves.read() {
        moved.send(PointerMoved {
            position: cursor.position,
        });
    }

    let Some(position) = windows.get_single().ok().and_then(|w| w.cursor_position()) else {
        return;
    };
    for button in mouse.get_just_pressed() {
        pressed.send(PointerPressed {
            position,
            button: *button,
        });
    }
}
