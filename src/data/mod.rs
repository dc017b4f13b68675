//! Data layer: populates the registries at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills NpcRegistry and
//! CalendarEventTable from the hard-coded town data defined in submodules,
//! then transitions the game into GameState::Playing.
//!
//! The event table depends on the year (locked passive festivals), so it is
//! rebuilt whenever a new year begins.

mod events;
mod npcs;

use bevy::prelude::*;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data)
            .add_systems(Update, rebuild_events_on_new_year);
    }
}

/// Single system that populates every registry and then transitions to Playing.
fn load_all_data(
    calendar: Res<Calendar>,
    mut npc_registry: ResMut<NpcRegistry>,
    mut event_table: ResMut<CalendarEventTable>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    npcs::populate_npcs(&mut npc_registry);
    info!("  NPCs loaded: {}", npc_registry.npcs.len());

    events::populate_events(&mut event_table, calendar.year);
    info!("  Event days loaded: {}", event_table.days.len());

    info!("DataPlugin: all registries populated. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}

fn rebuild_events_on_new_year(
    mut seasons: EventReader<SeasonChangeEvent>,
    mut event_table: ResMut<CalendarEventTable>,
) {
    for event in seasons.read() {
        if event.new_season == Season::Spring {
            events::populate_events(&mut event_table, event.year);
            info!("DataPlugin: event table rebuilt for year {}", event.year);
        }
    }
}
