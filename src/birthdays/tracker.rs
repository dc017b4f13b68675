//! Pointer position and clicked day, in the billboard's own pixel space.

use bevy::prelude::*;

use super::panel::{CalendarPanel, PanelError};
use crate::shared::*;

/// Last pointer position in UI pixels, `None` until the pointer moves over the billboard.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState(pub Option<Vec2>);

/// Day picked by the last primary click, consumed by the click-mode swap.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickedDay(pub Option<u8>);

/// Converts a cursor position into the space `DaySlot::bounds` is expressed in.
///
/// Pointer events arrive in logical window pixels, while the billboard lays out
/// its day cells in UI pixels, which are logical pixels divided by `UiScale`.
///
/// Pre: `window_px` is in logical window pixels and `ui_scale > 0`.
/// Post: the result can be tested directly against day slot bounds.
/// A non-positive scale is treated as 1.
pub fn window_to_panel(window_px: Vec2, ui_scale: f32) -> Vec2 {
    if ui_scale > 0.0 {
        window_px / ui_scale
    } else {
        window_px
    }
}

/// Day under `point`, if any. Refuses to guess on a broken day collection.
pub fn hit_test(panel: &impl CalendarPanel, point: Vec2) -> Result<Option<u8>, PanelError> {
    let days = panel.checked_days()?;
    Ok(days
        .iter()
        .find(|slot| slot.contains_point(point))
        .map(|slot| slot.day))
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Hover listener: keeps `PointerState` in sync with the cursor.
pub fn track_pointer_moves(
    mut moves: EventReader<PointerMoved>,
    ui_scale: Res<UiScale>,
    panels: Query<&Billboard>,
    mut pointer: ResMut<PointerState>,
) {
    let Some(last) = moves.read().last() else {
        return;
    };
    let Ok(billboard) = panels.get_single() else {
        return;
    };
    if billboard.is_quest_board() {
        return;
    }
    pointer.set_if_neq(PointerState(Some(window_to_panel(last.position, ui_scale.0))));
}

/// Click listener: records the day under a primary click.
pub fn track_clicks(
    mut presses: EventReader<PointerPressed>,
    ui_scale: Res<UiScale>,
    panels: Query<&Billboard>,
    mut clicked: ResMut<ClickedDay>,
) {
    let Ok(billboard) = panels.get_single() else {
        presses.clear();
        return;
    };
    for press in presses.read() {
        if press.button != MouseButton::Left || billboard.is_quest_board() {
            continue;
        }
        let point = window_to_panel(press.position, ui_scale.0);
        match hit_test(billboard, point) {
            Ok(Some(day)) => {
                info!("[Birthdays] Clicked day {} at {}", day, point);
                clicked.0 = Some(day);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("[Birthdays] Click ignored, {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_to_panel_divides_by_ui_scale() {
        assert_eq!(window_to_panel(Vec2::new(100.0, 50.0), 0.5), Vec2::new(200.0, 100.0));
        assert_eq!(window_to_panel(Vec2::new(100.0, 50.0), 1.0), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_window_to_panel_ignores_bad_scale() {
        assert_eq!(window_to_panel(Vec2::new(7.0, 9.0), 0.0), Vec2::new(7.0, 9.0));
    }

    #[test]
    fn test_hit_test_finds_day() {
        let billboard = Billboard::calendar(IVec2::ZERO);
        let day_10 = billboard.day(10).unwrap().bounds;
        let inside = day_10.center().as_vec2();
        assert_eq!(hit_test(&billboard, inside), Ok(Some(10)));
    }

    #[test]
    fn test_hit_test_edges_are_half_open() {
        let billboard = Billboard::calendar(IVec2::ZERO);
        let day_1 = billboard.day(1).unwrap().bounds;
        assert_eq!(hit_test(&billboard, day_1.min.as_vec2()), Ok(Some(1)));
        assert_eq!(hit_test(&billboard, day_1.max.as_vec2()), Ok(None));
    }

    #[test]
    fn test_hit_test_gap_between_days() {
        let billboard = Billboard::calendar(IVec2::ZERO);
        let day_1 = billboard.day(1).unwrap().bounds;
        let gap = Vec2::new(day_1.max.x as f32 + 1.0, day_1.center().y as f32);
        assert_eq!(hit_test(&billboard, gap), Ok(None));
    }

    #[test]
    fn test_hit_test_rejects_short_collection() {
        let mut days = Billboard::calendar(IVec2::ZERO).days().unwrap().to_vec();
        days.truncate(27);
        let billboard = Billboard::new(days);
        assert_eq!(
            hit_test(&billboard, Vec2::new(200.0, 250.0)),
            Err(PanelError::Corrupted { found: 27 })
        );
    }
}
