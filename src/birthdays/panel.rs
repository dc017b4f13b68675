//! The slice of the billboard the birthday overlay is allowed to see.

use bevy::prelude::*;
use thiserror::Error;

use crate::shared::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("billboard has no day collection")]
    Missing,
    #[error("billboard has {found} day slots, expected {expected}", expected = DAYS_PER_SEASON)]
    Corrupted { found: usize },
}

/// Host panel capabilities used by the controller, tracker and overlay.
///
/// Everything is read-only except [`CalendarPanel::set_day_sprite`].
pub trait CalendarPanel {
    fn day_slots(&self) -> Option<&[DaySlot]>;
    fn set_day_sprite(&mut self, day: u8, sprite: DaySprite) -> bool;
    fn is_quest_board(&self) -> bool;
    fn hover_text(&self) -> &str;
    fn cursor(&self) -> Vec2;
    fn pulse(&self) -> f32;

    /// The day slots, provided the collection is intact.
    fn checked_days(&self) -> Result<&[DaySlot], PanelError> {
        let days = self.day_slots().ok_or(PanelError::Missing)?;
        if days.len() != DAYS_PER_SEASON as usize {
            return Err(PanelError::Corrupted { found: days.len() });
        }
        Ok(days)
    }

    fn slot(&self, day: u8) -> Option<&DaySlot> {
        self.day_slots()?.iter().find(|slot| slot.day == day)
    }
}

impl CalendarPanel for Billboard {
    fn day_slots(&self) -> Option<&[DaySlot]> {
        self.days()
    }

    fn set_day_sprite(&mut self, day: u8, sprite: DaySprite) -> bool {
        Billboard::set_day_sprite(self, day, sprite)
    }

    fn is_quest_board(&self) -> bool {
        self.view() == BillboardView::QuestBoard
    }

    fn hover_text(&self) -> &str {
        Billboard::hover_text(self)
    }

    fn cursor(&self) -> Vec2 {
        Billboard::cursor(self)
    }

    fn pulse(&self) -> f32 {
        Billboard::pulse(self)
    }
}
