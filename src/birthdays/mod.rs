//! Birthday domain: shared-birthday portraits on the billboard calendar.
//!
//! Responsible for:
//! - Indexing NPC birthdays per season and day (`registry`)
//! - Reading the user options (`config`)
//! - Cycling the portrait of days with several birthdays (`controller`)
//! - Tracking the pointer and clicked day over the calendar (`tracker`)
//! - Recording the shared-day overlay drawn above the billboard (`overlay`)
//!   and presenting it as UI nodes (`present`)
//!
//! Frame order while the billboard is open follows [`BillboardFrame`]:
//! listeners run in `Input`, portrait swaps in `PreDraw` (before the billboard
//! draws its cells in `HostDraw`), and the overlay is recorded in `Overlay`.

pub mod config;
pub mod controller;
pub mod overlay;
pub mod panel;
pub mod present;
pub mod registry;
pub mod tracker;

use bevy::prelude::*;

use crate::shared::*;
use config::BirthdayConfig;
use controller::{CycleMode, CycleModeController};
use overlay::{BirthdayIcon, OverlayDrawList};
use panel::CalendarPanel;
use registry::{BirthdayRegistry, BirthdaySource};
use tracker::{ClickedDay, PointerState};

/// Days of the displayed season with more than one birthday.
/// Fetched when the billboard opens and whenever birthdays change.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SharedDaySet {
    pub season: Season,
    pub days: Vec<u8>,
}

impl Default for SharedDaySet {
    fn default() -> Self {
        Self {
            season: Season::Spring,
            days: Vec::new(),
        }
    }
}

impl SharedDaySet {
    pub fn refresh(&mut self, source: &impl BirthdaySource, season: Season) {
        self.season = season;
        self.days = source.days(season, true);
    }
}

pub struct BirthdayPlugin;

impl Plugin for BirthdayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BirthdayConfig>()
            .init_resource::<BirthdayRegistry>()
            .init_resource::<SharedDaySet>()
            .init_resource::<CycleModeController>()
            .init_resource::<PointerState>()
            .init_resource::<ClickedDay>()
            .init_resource::<OverlayDrawList>()
            .init_resource::<BirthdayIcon>()
            .configure_sets(
                Update,
                (
                    BillboardFrame::Input,
                    BillboardFrame::PreDraw,
                    BillboardFrame::HostDraw,
                    BillboardFrame::Overlay,
                    BillboardFrame::Present,
                )
                    .chain()
                    .run_if(in_state(GameState::Billboard)),
            )
            .add_systems(
                Startup,
                (
                    (config::load_birthday_config, apply_configured_mode).chain(),
                    overlay::load_birthday_icon,
                ),
            )
            .add_systems(
                Update,
                (
                    overlay::watch_birthday_icon,
                    // Mode changes settle before this frame's listeners run.
                    (
                        controller::request_next_mode_on_hotkey
                            .run_if(in_state(GameState::Billboard)),
                        controller::apply_mode_change_requests,
                    )
                        .chain()
                        .before(BillboardFrame::Input),
                    (mark_birthdays_stale_on_season_change, refresh_shared_days)
                        .chain()
                        .before(BillboardFrame::Input),
                ),
            )
            // Listeners are attached only while the billboard is open.
            .add_systems(
                OnEnter(GameState::Billboard),
                (attach_controller, present::spawn_overlay_root),
            )
            .add_systems(
                OnExit(GameState::Billboard),
                (detach_controller, present::despawn_overlay_root),
            )
            .add_systems(
                Update,
                (
                    tracker::track_pointer_moves.run_if(pointer_listener_subscribed),
                    tracker::track_clicks.run_if(click_listener_subscribed),
                )
                    .in_set(BillboardFrame::Input),
            )
            .add_systems(
                Update,
                (prepare_opened_billboard, controller::tick_cycle_controller)
                    .chain()
                    .in_set(BillboardFrame::PreDraw),
            )
            .add_systems(
                Update,
                overlay::record_overlay.in_set(BillboardFrame::Overlay),
            )
            .add_systems(
                Update,
                present::present_overlay.in_set(BillboardFrame::Present),
            );
    }
}

// ─── Run Conditions ───────────────────────────────────────────────────────────

pub fn pointer_listener_subscribed(controller: Res<CycleModeController>) -> bool {
    controller.listeners().pointer_moves
}

pub fn click_listener_subscribed(controller: Res<CycleModeController>) -> bool {
    controller.listeners().clicks
}

// ─── Lifecycle ────────────────────────────────────────────────────────────────

/// Startup: run the configured cycle type through the normal transition path.
pub fn apply_configured_mode(
    mut config: ResMut<BirthdayConfig>,
    mut controller: ResMut<CycleModeController>,
) {
    let mode: CycleMode = controller.request_mode(&config.cycle_type);
    if config.cycle_type != mode.as_str() {
        config.cycle_type = mode.as_str().to_string();
    }
}

pub fn attach_controller(mut controller: ResMut<CycleModeController>) {
    controller.attach();
    info!("[Birthdays] Billboard opened, cycling in {:?} mode", controller.mode());
}

/// Nothing about cycling survives a closed billboard.
pub fn detach_controller(
    mut controller: ResMut<CycleModeController>,
    mut pointer: ResMut<PointerState>,
    mut clicked: ResMut<ClickedDay>,
    mut draw_list: ResMut<OverlayDrawList>,
) {
    controller.detach();
    *pointer = PointerState::default();
    *clicked = ClickedDay::default();
    draw_list.commands.clear();
    info!("[Birthdays] Billboard closed");
}

/// First frame of a newly opened billboard: recheck birthdays, cache the
/// shared days and give every birthday day its primary portrait.
pub fn prepare_opened_billboard(
    calendar: Res<Calendar>,
    npcs: Res<NpcRegistry>,
    mut registry: ResMut<BirthdayRegistry>,
    mut shared: ResMut<SharedDaySet>,
    mut changed: EventWriter<BirthdayEventsChanged>,
    mut panels: Query<&mut Billboard, Added<Billboard>>,
) {
    for mut billboard in &mut panels {
        if registry.recheck_events(&npcs) {
            changed.send(BirthdayEventsChanged);
        }
        let season = calendar.season;
        shared.refresh(&*registry, season);

        if billboard.is_quest_board() {
            continue;
        }
        if let Err(e) = billboard.checked_days() {
            warn!("[Birthdays] Not decorating the billboard, {}", e);
            continue;
        }

        for day in registry.days(season, false) {
            match registry.sprite(season, day, false) {
                Ok(sprite) => {
                    billboard.set_day_sprite(day, sprite);
                }
                Err(e) => {
                    error!(
                        "[Birthdays] Problem resolving the birthday sprite for {:?} {}: {}",
                        season, day, e
                    );
                }
            }
        }
        info!(
            "[Birthdays] {:?}: shared birthdays on days {:?}",
            season, shared.days
        );
    }
}

/// The displayed season moved on, so every cached day set is stale.
pub fn mark_birthdays_stale_on_season_change(
    mut seasons: EventReader<SeasonChangeEvent>,
    mut changed: EventWriter<BirthdayEventsChanged>,
) {
    if let Some(event) = seasons.read().last() {
        debug!("[Birthdays] Season is now {:?}, birthday days are stale", event.new_season);
        changed.send(BirthdayEventsChanged);
    }
}

/// Re-fetches the shared day set when the birthday data reports a change.
pub fn refresh_shared_days(
    mut changed: EventReader<BirthdayEventsChanged>,
    calendar: Res<Calendar>,
    registry: Res<BirthdayRegistry>,
    mut shared: ResMut<SharedDaySet>,
) {
    if changed.is_empty() {
        return;
    }
    changed.clear();
    shared.refresh(&*registry, calendar.season);
}
