//! Birthday lookup per season and day, with a rotating cursor for days
//! shared by several NPCs.

use bevy::prelude::*;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::shared::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteResolveError {
    #[error("no birthday on {season:?} {day}")]
    NoBirthday { season: Season, day: u8 },
    #[error("portrait {index} of {npc_id} is outside the portrait sheet")]
    PortraitOutOfRange { npc_id: NpcId, index: u32 },
}

/// What the controller needs from whoever knows the birthdays.
pub trait BirthdaySource {
    /// Rebuilds the day index from the NPC data. Returns true if anything changed.
    fn recheck_events(&mut self, npcs: &NpcRegistry) -> bool;

    /// Days with at least one birthday, or only the shared ones. Ascending.
    fn days(&self, season: Season, shared_only: bool) -> Vec<u8>;

    /// The sprite for `day`. `alternate` advances to the next NPC of that day.
    fn sprite(&mut self, season: Season, day: u8, alternate: bool)
        -> Result<DaySprite, SpriteResolveError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayEntry {
    pub npc_id: NpcId,
    pub name: String,
    pub portrait_index: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct BirthdayRegistry {
    by_day: BTreeMap<(Season, u8), Vec<BirthdayEntry>>,
    cursors: HashMap<(Season, u8), usize>,
}

impl BirthdayRegistry {
    pub fn entries(&self, season: Season, day: u8) -> &[BirthdayEntry] {
        self.by_day
            .get(&(season, day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl BirthdaySource for BirthdayRegistry {
    fn recheck_events(&mut self, npcs: &NpcRegistry) -> bool {
        let mut by_day: BTreeMap<(Season, u8), Vec<BirthdayEntry>> = BTreeMap::new();
        for npc in npcs.npcs.values() {
            if !(1..=DAYS_PER_SEASON).contains(&npc.birthday_day) {
                warn!(
                    "[Birthdays] {} has birthday day {} outside 1-{}; ignoring",
                    npc.id, npc.birthday_day, DAYS_PER_SEASON
                );
                continue;
            }
            by_day
                .entry((npc.birthday_season, npc.birthday_day))
                .or_default()
                .push(BirthdayEntry {
                    npc_id: npc.id.clone(),
                    name: npc.name.clone(),
                    portrait_index: npc.portrait_index,
                });
        }
        for entries in by_day.values_mut() {
            entries.sort_by(|a, b| a.npc_id.cmp(&b.npc_id));
        }

        self.cursors.clear();
        let changed = by_day != self.by_day;
        self.by_day = by_day;
        if changed {
            info!(
                "[Birthdays] Rechecked birthdays: {} days, {} shared",
                self.by_day.len(),
                self.by_day.values().filter(|e| e.len() > 1).count()
            );
        }
        changed
    }

    fn days(&self, season: Season, shared_only: bool) -> Vec<u8> {
        self.by_day
            .range((season, 1)..=(season, DAYS_PER_SEASON))
            .filter(|(_, entries)| !shared_only || entries.len() > 1)
            .map(|((_, day), _)| *day)
            .collect()
    }

    fn sprite(
        &mut self,
        season: Season,
        day: u8,
        alternate: bool,
    ) -> Result<DaySprite, SpriteResolveError> {
        let count = self.entries(season, day).len();
        if count == 0 {
            return Err(SpriteResolveError::NoBirthday { season, day });
        }

        let cursor = self.cursors.entry((season, day)).or_insert(0);
        if alternate {
            *cursor = (*cursor + 1) % count;
        }
        let index = *cursor % count;

        let entry = &self.entries(season, day)[index];
        if entry.portrait_index >= PORTRAIT_COLUMNS * PORTRAIT_ROWS {
            return Err(SpriteResolveError::PortraitOutOfRange {
                npc_id: entry.npc_id.clone(),
                index: entry.portrait_index,
            });
        }
        Ok(DaySprite::portrait(entry.portrait_index))
    }
}
