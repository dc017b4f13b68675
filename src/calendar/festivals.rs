//! Festival calendar.
//!
//! Four seasonal festivals take over a whole day:
//! - Egg Festival (Spring 13)
//! - Luau (Summer 11)
//! - Harvest Festival (Fall 16)
//! - Winter Star (Winter 25)
//!
//! Passive festivals run for several days alongside normal play. Some stay
//! locked until a later year, and the billboard greys their badge out.

use bevy::prelude::*;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════

/// Identifies which festival is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FestivalKind {
    EggFestival,     // Spring 13
    Luau,            // Summer 11
    HarvestFestival, // Fall 16
    WinterStar,      // Winter 25
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassiveFestival {
    FlowerMarket,  // Spring 15-17
    NightMarket,   // Winter 15-17
    TroutDerby,    // Summer 20-21
    SquidFest,     // Winter 12-13
}

impl PassiveFestival {
    pub const ALL: [PassiveFestival; 4] = [
        PassiveFestival::FlowerMarket,
        PassiveFestival::NightMarket,
        PassiveFestival::TroutDerby,
        PassiveFestival::SquidFest,
    ];

    pub fn season(self) -> Season {
        match self {
            PassiveFestival::FlowerMarket => Season::Spring,
            PassiveFestival::NightMarket => Season::Winter,
            PassiveFestival::TroutDerby => Season::Summer,
            PassiveFestival::SquidFest => Season::Winter,
        }
    }

    pub fn days(self) -> std::ops::RangeInclusive<u8> {
        match self {
            PassiveFestival::FlowerMarket => 15..=17,
            PassiveFestival::NightMarket => 15..=17,
            PassiveFestival::TroutDerby => 20..=21,
            PassiveFestival::SquidFest => 12..=13,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PassiveFestival::FlowerMarket => "Flower Market",
            PassiveFestival::NightMarket => "Night Market",
            PassiveFestival::TroutDerby => "Trout Derby",
            PassiveFestival::SquidFest => "SquidFest",
        }
    }

    /// Derbies get their own badge on the billboard.
    pub fn is_fishing_derby(self) -> bool {
        matches!(self, PassiveFestival::TroutDerby | PassiveFestival::SquidFest)
    }

    /// First year the festival is open to the player.
    pub fn first_year(self) -> u32 {
        match self {
            PassiveFestival::NightMarket => 2,
            _ => 1,
        }
    }
}

/// Tracks which day's festival announcement has already been sent.
#[derive(Resource, Debug, Clone, Default)]
pub struct FestivalState {
    pub active: Option<FestivalKind>,
    pub announced_day: Option<(Season, u8, u32)>,
}

// ═══════════════════════════════════════════════════════════════════════
// HELPER: map (Season, day) to festivals
// ═══════════════════════════════════════════════════════════════════════

pub fn festival_for_date(season: Season, day: u8) -> Option<FestivalKind> {
    match (season, day) {
        (Season::Spring, 13) => Some(FestivalKind::EggFestival),
        (Season::Summer, 11) => Some(FestivalKind::Luau),
        (Season::Fall, 16) => Some(FestivalKind::HarvestFestival),
        (Season::Winter, 25) => Some(FestivalKind::WinterStar),
        _ => None,
    }
}

pub fn festival_display_name(kind: FestivalKind) -> &'static str {
    match kind {
        FestivalKind::EggFestival => "Egg Festival",
        FestivalKind::Luau => "Luau",
        FestivalKind::HarvestFestival => "Harvest Festival",
        FestivalKind::WinterStar => "Winter Star Festival",
    }
}

pub fn passive_festivals_on(season: Season, day: u8) -> impl Iterator<Item = PassiveFestival> {
    PassiveFestival::ALL
        .into_iter()
        .filter(move |f| f.season() == season && f.days().contains(&day))
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEM: check_festival_day
// ═══════════════════════════════════════════════════════════════════════

/// Runs every frame in Playing. Announces today's festival once per day.
pub fn check_festival_day(
    calendar: Res<Calendar>,
    mut festival: ResMut<FestivalState>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    let today = (calendar.season, calendar.day, calendar.year);
    festival.active = festival_for_date(calendar.season, calendar.day);

    let Some(kind) = festival.active else {
        return;
    };
    if festival.announced_day == Some(today) {
        return;
    }
    festival.announced_day = Some(today);

    let name = festival_display_name(kind);
    toast_writer.send(ToastEvent {
        message: format!("Today is the {}!", name),
        duration_secs: 5.0,
    });
    info!("[Festivals] Announced {} on Day {} {:?}", name, calendar.day, calendar.season);
}
