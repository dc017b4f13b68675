//! Presents the recorded overlay as UI nodes stacked above the billboard.

use bevy::prelude::*;

use super::overlay::{BirthdayIcon, DrawCommand, OverlayDrawList};
use crate::shared::*;

/// Above the billboard's own layer.
pub const OVERLAY_Z: i32 = 20;

/// Pointer arrow on the cursor sheet.
const CURSOR_SOURCE: URect = URect {
    min: UVec2::new(0, 0),
    max: UVec2::new(8, 10),
};

#[derive(Component)]
pub struct OverlayRoot;

pub fn spawn_overlay_root(mut commands: Commands) {
    commands.spawn((
        OverlayRoot,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        GlobalZIndex(OVERLAY_Z),
        PickingBehavior::IGNORE,
    ));
}

pub fn despawn_overlay_root(mut commands: Commands, query: Query<Entity, With<OverlayRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

fn placed(rect: Rect) -> Node {
    Node {
        position_type: PositionType::Absolute,
        left: Val::Px(rect.min.x),
        top: Val::Px(rect.min.y),
        width: Val::Px(rect.width()),
        height: Val::Px(rect.height()),
        ..default()
    }
}

/// Rebuilds the overlay layer from this frame's draw list.
pub fn present_overlay(
    mut commands: Commands,
    draw_list: Res<OverlayDrawList>,
    sheets: Res<SheetHandles>,
    icon: Res<BirthdayIcon>,
    roots: Query<Entity, With<OverlayRoot>>,
) {
    let Ok(root) = roots.get_single() else {
        return;
    };
    commands.entity(root).despawn_descendants();

    let handle_for = |sheet: SpriteSheet| match sheet {
        SpriteSheet::BirthdayIcon => Some(icon.handle.clone()),
        other => sheets.get(other),
    };

    commands.entity(root).with_children(|parent| {
        for command in &draw_list.commands {
            match command {
                DrawCommand::Fill { rect, color } => {
                    parent.spawn((placed(*rect), BackgroundColor(*color), PickingBehavior::IGNORE));
                }
                DrawCommand::Sprite {
                    sheet,
                    source,
                    rect,
                    tint,
                } => {
                    let Some(image) = handle_for(*sheet) else {
                        continue;
                    };
                    parent.spawn((
                        placed(*rect),
                        ImageNode {
                            image,
                            rect: source.map(|s| s.as_rect()),
                            color: *tint,
                            ..default()
                        },
                        PickingBehavior::IGNORE,
                    ));
                }
                DrawCommand::Border {
                    rect,
                    thickness,
                    color,
                } => {
                    let mut node = placed(*rect);
                    node.border = UiRect::all(Val::Px(*thickness));
                    parent.spawn((node, BorderColor(*color), PickingBehavior::IGNORE));
                }
                DrawCommand::Cursor { position } => {
                    let Some(image) = sheets.get(SpriteSheet::Cursors) else {
                        continue;
                    };
                    let size = CURSOR_SOURCE.size().as_vec2() * PIXEL_ZOOM;
                    parent.spawn((
                        placed(Rect::from_corners(*position, *position + size)),
                        ImageNode {
                            image,
                            rect: Some(CURSOR_SOURCE.as_rect()),
                            ..default()
                        },
                        PickingBehavior::IGNORE,
                    ));
                }
                DrawCommand::HoverText { text, position } => {
                    parent
                        .spawn((
                            Node {
                                position_type: PositionType::Absolute,
                                left: Val::Px(position.x),
                                top: Val::Px(position.y),
                                padding: UiRect::all(Val::Px(12.0)),
                                border: UiRect::all(Val::Px(2.0)),
                                ..default()
                            },
                            BackgroundColor(Color::srgba(0.98, 0.92, 0.78, 0.95)),
                            BorderColor(Color::srgb(0.45, 0.28, 0.12)),
                            PickingBehavior::IGNORE,
                        ))
                        .with_children(|tooltip| {
                            tooltip.spawn((
                                Text::new(text.clone()),
                                TextFont {
                                    font_size: 22.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.25, 0.15, 0.05)),
                                PickingBehavior::IGNORE,
                            ));
                        });
                }
            }
        }
    });
}
