//! The town billboard menu: calendar grid and quest board.
//!
//! The billboard lives in UI pixels. Its root is stacked at `BILLBOARD_Z`
//! and owns its own software cursor and tooltip, so anything drawn above it
//! must redraw those.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use crate::shared::*;
use super::UiFontHandle;

pub const BILLBOARD_Z: i32 = 10;

const CALENDAR_SOURCE: URect = URect {
    min: UVec2::new(0, 198),
    max: UVec2::new(338, 396),
};
const QUEST_BOARD_SOURCE: URect = URect {
    min: UVec2::new(0, 0),
    max: UVec2::new(338, 198),
};
const CURSOR_SOURCE: URect = URect {
    min: UVec2::new(0, 0),
    max: UVec2::new(8, 10),
};
const PORTRAIT_OFFSET: Vec2 = Vec2::new(48.0, 28.0);
const TOOLTIP_OFFSET: Vec2 = Vec2::new(32.0, 32.0);

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct BillboardBackdrop;

#[derive(Component)]
pub struct DayCell {
    pub day: u8,
}

#[derive(Component)]
pub struct DayCellPortrait {
    pub day: u8,
}

#[derive(Component)]
pub struct BillboardCursor;

#[derive(Component)]
pub struct BillboardTooltip;

#[derive(Component)]
pub struct BillboardTooltipText;

// ═══════════════════════════════════════════════════════════════════════
// LAYOUT
// ═══════════════════════════════════════════════════════════════════════

/// UiScale at which the whole billboard fits inside the window.
pub fn fit_ui_scale(window: Vec2) -> f32 {
    let scale = (window.x / BILLBOARD_WIDTH).min(window.y / BILLBOARD_HEIGHT);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Top-left of a centred billboard, in UI pixels.
pub fn billboard_origin(window: Vec2, ui_scale: f32) -> IVec2 {
    let scale = if ui_scale > 0.0 { ui_scale } else { 1.0 };
    let room = window / scale - Vec2::new(BILLBOARD_WIDTH, BILLBOARD_HEIGHT);
    (room / 2.0).floor().as_ivec2()
}

/// Tooltip for one day: every birthday, then the day's events.
pub fn day_hover_text(
    npcs: &NpcRegistry,
    events: Option<&DayEvents>,
    season: Season,
    day: u8,
) -> String {
    let mut lines: Vec<String> = npcs
        .birthdays_on(season, day)
        .into_iter()
        .map(|npc| format!("{}'s Birthday", npc.name))
        .collect();
    if let Some(events) = events {
        lines.extend(events.labels.iter().cloned());
    }
    lines.join("\n")
}

/// The calendar for `season` with each day's events and tooltip filled in.
pub fn build_billboard(
    origin: IVec2,
    season: Season,
    npcs: &NpcRegistry,
    table: &CalendarEventTable,
) -> Billboard {
    let days = (1..=DAYS_PER_SEASON)
        .map(|day| {
            let events = table.get(season, day);
            let mut slot = DaySlot::new(day, day_slot_bounds(origin, day));
            slot.hover_text = day_hover_text(npcs, events, season, day);
            if let Some(events) = events {
                slot.events = events.clone();
            }
            slot
        })
        .collect();
    Billboard::new(days)
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

// ═══════════════════════════════════════════════════════════════════════
// OPEN / CLOSE
// ═══════════════════════════════════════════════════════════════════════

pub fn open_billboard(
    player_input: Res<PlayerInput>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if player_input.open_calendar {
        next_state.set(GameState::Billboard);
    }
}

pub fn spawn_billboard(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_scale: Res<UiScale>,
    calendar: Res<Calendar>,
    npcs: Res<NpcRegistry>,
    table: Res<CalendarEventTable>,
    sheets: Res<SheetHandles>,
    font_handle: Res<UiFontHandle>,
) {
    let window = windows
        .get_single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let origin = billboard_origin(window, ui_scale.0);
    let billboard = build_billboard(origin, calendar.season, &npcs, &table);
    let backdrop = IRect::from_corners(
        origin,
        origin + Vec2::new(BILLBOARD_WIDTH, BILLBOARD_HEIGHT).as_ivec2(),
    )
    .as_rect();
    let font = font_handle.0.clone();
    let billboard_sheet = sheets.get(SpriteSheet::Billboard).unwrap_or_default();
    let portrait_sheet = sheets.get(SpriteSheet::Portraits).unwrap_or_default();
    let cursor_sheet = sheets.get(SpriteSheet::Cursors).unwrap_or_default();

    let slots: Vec<(u8, Rect)> = billboard
        .days()
        .unwrap_or_default()
        .iter()
        .map(|slot| (slot.day, slot.bounds.as_rect()))
        .collect();

    commands
        .spawn((
            billboard,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            GlobalZIndex(BILLBOARD_Z),
        ))
        .with_children(|parent| {
            parent.spawn((
                BillboardBackdrop,
                placed(backdrop),
                ImageNode {
                    image: billboard_sheet,
                    rect: Some(CALENDAR_SOURCE.as_rect()),
                    ..default()
                },
            ));

            for (day, rect) in slots {
                parent
                    .spawn((
                        DayCell { day },
                        Node {
                            border: UiRect::all(Val::Px(PIXEL_ZOOM)),
                            ..placed(rect)
                        },
                        BackgroundColor(Color::NONE),
                        BorderColor(Color::NONE),
                    ))
                    .with_children(|cell| {
                        cell.spawn((
                            Text::new(day.to_string()),
                            TextFont {
                                font: font.clone(),
                                font_size: 24.0,
                                ..default()
                            },
                            TextColor(Color::srgb(0.3, 0.2, 0.1)),
                        ));
                        let portrait = Rect::from_corners(
                            PORTRAIT_OFFSET,
                            PORTRAIT_OFFSET
                                + Vec2::new(PORTRAIT_WIDTH as f32, PORTRAIT_HEIGHT as f32) * PIXEL_ZOOM,
                        );
                        cell.spawn((
                            DayCellPortrait { day },
                            placed(portrait),
                            ImageNode::new(portrait_sheet.clone()),
                            Visibility::Hidden,
                        ));
                    });
            }

            let cursor_size = CURSOR_SOURCE.size().as_vec2() * PIXEL_ZOOM;
            parent.spawn((
                BillboardCursor,
                placed(Rect::from_corners(Vec2::ZERO, cursor_size)),
                ImageNode {
                    image: cursor_sheet,
                    rect: Some(CURSOR_SOURCE.as_rect()),
                    ..default()
                },
            ));

            parent
                .spawn((
                    BillboardTooltip,
                    Node {
                        position_type: PositionType::Absolute,
                        padding: UiRect::all(Val::Px(12.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.98, 0.92, 0.78, 0.95)),
                    Visibility::Hidden,
                ))
                .with_children(|tooltip| {
                    tooltip.spawn((
                        BillboardTooltipText,
                        Text::new(""),
                        TextFont {
                            font: font.clone(),
                            font_size: 22.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.25, 0.15, 0.05)),
                    ));
                });

            parent.spawn((
                Text::new("[Q] Quest board   [F6] Birthday cycling   [Esc] Close"),
                TextFont {
                    font: font.clone(),
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(backdrop.min.x + 16.0),
                    top: Val::Px(backdrop.max.y + 8.0),
                    ..default()
                },
            ));
        });

    info!(
        "[Billboard] Opened at {} (UiScale {:.3}) for {:?}",
        origin, ui_scale.0, calendar.season
    );
}

pub fn despawn_billboard(mut commands: Commands, query: Query<Entity, With<Billboard>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NAVIGATION
// ═══════════════════════════════════════════════════════════════════════

pub fn billboard_navigation(
    player_input: Res<PlayerInput>,
    mut next_state: ResMut<NextState<GameState>>,
    mut panels: Query<&mut Billboard>,
) {
    if player_input.ui_cancel {
        next_state.set(GameState::Playing);
        return;
    }
    if !player_input.toggle_quest_board {
        return;
    }
    let Ok(mut billboard) = panels.get_single_mut() else {
        return;
    };
    let view = match billboard.view() {
        BillboardView::Calendar => BillboardView::QuestBoard,
        BillboardView::QuestBoard => BillboardView::Calendar,
    };
    billboard.set_view(view);
    billboard.set_hover_text("");
    info!("[Billboard] Switched to {:?}", view);
}

// ═══════════════════════════════════════════════════════════════════════
// HOST DRAW
// ═══════════════════════════════════════════════════════════════════════

/// Moves the software cursor and picks the tooltip of the day under it.
pub fn update_billboard_hover(
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_scale: Res<UiScale>,
    mut panels: Query<&mut Billboard>,
) {
    let Ok(mut billboard) = panels.get_single_mut() else {
        return;
    };
    let Some(window_px) = windows.get_single().ok().and_then(|w| w.cursor_position()) else {
        return;
    };
    let scale = if ui_scale.0 > 0.0 { ui_scale.0 } else { 1.0 };
    let point = window_px / scale;
    if billboard.cursor() != point {
        billboard.set_cursor(point);
    }

    if billboard.view() == BillboardView::QuestBoard {
        return;
    }
    let text = billboard
        .days()
        .and_then(|days| days.iter().find(|slot| slot.contains_point(point)))
        .map(|slot| slot.hover_text.clone())
        .unwrap_or_default();
    if billboard.hover_text() != text {
        billboard.set_hover_text(text);
    }
}

/// Bounce between 0 and 8 pixels.
pub fn animate_pulse(time: Res<Time<Real>>, mut panels: Query<&mut Billboard>) {
    for mut billboard in &mut panels {
        let t = time.elapsed_secs();
        billboard.set_pulse(4.0 + 4.0 * (t * 6.0).sin());
    }
}

pub fn sync_billboard_view(
    panels: Query<&Billboard, Changed<Billboard>>,
    mut backdrops: Query<&mut ImageNode, With<BillboardBackdrop>>,
    mut cells: Query<&mut Visibility, With<DayCell>>,
) {
    let Ok(billboard) = panels.get_single() else {
        return;
    };
    let (source, cell_visibility) = match billboard.view() {
        BillboardView::Calendar => (CALENDAR_SOURCE, Visibility::Inherited),
        BillboardView::QuestBoard => (QUEST_BOARD_SOURCE, Visibility::Hidden),
    };
    for mut backdrop in &mut backdrops {
        backdrop.rect = Some(source.as_rect());
    }
    for mut visibility in &mut cells {
        *visibility = cell_visibility;
    }
}

/// Draws each day's current sprite, dims past days and frames today.
pub fn sync_day_cells(
    calendar: Res<Calendar>,
    sheets: Res<SheetHandles>,
    panels: Query<&Billboard>,
    mut cells: Query<(&DayCell, &mut BackgroundColor, &mut BorderColor)>,
    mut portraits: Query<(&DayCellPortrait, &mut ImageNode, &mut Visibility)>,
) {
    let Ok(billboard) = panels.get_single() else {
        return;
    };

    for (cell, mut background, mut border) in &mut cells {
        background.0 = if cell.day < calendar.day {
            Color::srgba(0.5, 0.5, 0.5, 0.25)
        } else {
            Color::NONE
        };
        border.0 = if cell.day == calendar.day {
            Color::srgb(0.0, 0.0, 1.0)
        } else {
            Color::NONE
        };
    }

    for (portrait, mut image, mut visibility) in &mut portraits {
        let sprite = billboard.day(portrait.day).and_then(|slot| slot.sprite);
        let Some(sprite) = sprite else {
            *visibility = Visibility::Hidden;
            continue;
        };
        if let Some(handle) = sheets.get(sprite.sheet) {
            if image.image != handle {
                image.image = handle;
            }
        }
        let rect = Some(sprite.source.as_rect());
        if image.rect != rect {
            image.rect = rect;
        }
        *visibility = Visibility::Inherited;
    }
}

pub fn sync_cursor_and_tooltip(
    panels: Query<&Billboard>,
    mut cursors: Query<&mut Node, (With<BillboardCursor>, Without<BillboardTooltip>)>,
    mut tooltips: Query<(&mut Node, &mut Visibility), With<BillboardTooltip>>,
    mut texts: Query<&mut Text, With<BillboardTooltipText>>,
) {
    let Ok(billboard) = panels.get_single() else {
        return;
    };
    let cursor = billboard.cursor();
    for mut node in &mut cursors {
        node.left = Val::Px(cursor.x);
        node.top = Val::Px(cursor.y);
    }

    let text = billboard.hover_text();
    for (mut node, mut visibility) in &mut tooltips {
        node.left = Val::Px(cursor.x + TOOLTIP_OFFSET.x);
        node.top = Val::Px(cursor.y + TOOLTIP_OFFSET.y);
        *visibility = if text.is_empty() {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
    for mut label in &mut texts {
        if label.0 != text {
            label.0 = text.to_string();
        }
    }
}
