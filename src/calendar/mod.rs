//! Calendar domain: the date the billboard shows.
//!
//! Responsible for:
//! - Advancing days, seasons and years
//! - Sending DayEndEvent and SeasonChangeEvent
//! - Announcing festival days
//! - Providing a manual sleep trigger (press B while playing)

pub mod festivals;

use bevy::prelude::*;

use crate::shared::*;
use festivals::FestivalState;

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FestivalState>()
            .add_systems(
                Update,
                (trigger_sleep, process_day_end, festivals::check_festival_day)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─── Manual sleep trigger ────────────────────────────────────────────────────

/// Ends the current day when the player sleeps.
fn trigger_sleep(
    player_input: Res<PlayerInput>,
    calendar: Res<Calendar>,
    mut day_end_events: EventWriter<DayEndEvent>,
) {
    if !player_input.sleep {
        return;
    }

    info!(
        "[Calendar] Player slept on Day {} {:?} Year {}",
        calendar.day, calendar.season, calendar.year
    );

    day_end_events.send(DayEndEvent {
        day: calendar.day,
        season: calendar.season,
        year: calendar.year,
    });
}

// ─── Day-end processing ──────────────────────────────────────────────────────

/// Moves the calendar to the next day. Returns the new season when the
/// season rolled over.
pub fn advance_day(calendar: &mut Calendar) -> Option<Season> {
    calendar.day += 1;
    if calendar.day <= DAYS_PER_SEASON {
        return None;
    }

    calendar.day = 1;
    let old_season = calendar.season;
    calendar.season = calendar.season.next();
    info!(
        "[Calendar] Season changed: {:?} -> {:?} (Year {})",
        old_season, calendar.season, calendar.year
    );

    // Year rollover happens when Spring begins again
    if calendar.season == Season::Spring {
        calendar.year += 1;
        info!("[Calendar] New Year! Year {}", calendar.year);
    }
    Some(calendar.season)
}

/// Advances the calendar for each ended day that still matches it.
/// Stale events (the calendar already moved past them) are skipped.
fn process_day_end(
    mut day_end_reader: EventReader<DayEndEvent>,
    mut season_writer: EventWriter<SeasonChangeEvent>,
    mut calendar: ResMut<Calendar>,
) {
    for event in day_end_reader.read() {
        let current = event.day == calendar.day
            && event.season == calendar.season
            && event.year == calendar.year;
        if !current {
            continue;
        }

        if let Some(new_season) = advance_day(&mut calendar) {
            season_writer.send(SeasonChangeEvent {
                new_season,
                year: calendar.year,
            });
        }

        info!(
            "[Calendar] New day: Day {} {:?} Year {}",
            calendar.day, calendar.season, calendar.year
        );
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
