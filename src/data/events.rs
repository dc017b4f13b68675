use crate::calendar::festivals::{
    festival_display_name, festival_for_date, passive_festivals_on,
};
use crate::shared::*;

/// Days the travelling bookseller parks in town, per season.
const BOOKSELLER_DAYS: [(Season, [u8; 2]); 4] = [
    (Season::Spring, [10, 22]),
    (Season::Summer, [6, 27]),
    (Season::Fall, [10, 21]),
    (Season::Winter, [5, 19]),
];

/// Town weddings held at the chapel.
const WEDDINGS: &[(Season, u8, &str)] = &[
    (Season::Spring, 3, "Wedding: Pip & Hazel"),
    (Season::Fall, 25, "Wedding: Elena & Finn"),
];

/// Rebuild the event table for the given year. Passive festivals the player
/// cannot attend yet are marked locked.
pub fn populate_events(table: &mut CalendarEventTable, year: u32) {
    table.days.clear();

    for season in Season::ALL {
        for day in 1..=DAYS_PER_SEASON {
            if let Some(kind) = festival_for_date(season, day) {
                table.add(season, day, DayEventFlags::FESTIVAL, festival_display_name(kind));
            }

            for passive in passive_festivals_on(season, day) {
                let flag = if passive.is_fishing_derby() {
                    DayEventFlags::FISHING_DERBY
                } else {
                    DayEventFlags::PASSIVE_FESTIVAL
                };
                table.add(season, day, flag, passive.display_name());
                if passive.first_year() > year {
                    if let Some(events) = table.days.get_mut(&(season, day)) {
                        events.passive_festival_locked = true;
                    }
                }
            }
        }
    }

    for (season, days) in BOOKSELLER_DAYS {
        for day in days {
            table.add(season, day, DayEventFlags::BOOKSELLER, "Bookseller in town");
        }
    }

    for &(season, day, label) in WEDDINGS {
        table.add(season, day, DayEventFlags::WEDDING, label);
    }
}
