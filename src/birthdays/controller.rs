//! Cycle mode state machine: decides, frame by frame, which shared days get
//! their portrait swapped before the billboard draws.

use bevy::prelude::*;
use std::str::FromStr;

use super::config::{BirthdayConfig, ConfigError};
use super::panel::CalendarPanel;
use super::registry::{BirthdayRegistry, BirthdaySource};
use super::tracker::{ClickedDay, PointerState};
use super::SharedDaySet;
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CycleMode {
    /// Every shared day swaps each cycle.
    #[default]
    Always,
    /// Only the shared day under the pointer swaps each cycle.
    Hover,
    /// A shared day swaps when clicked. No timer.
    Click,
}

impl CycleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CycleMode::Always => "Always",
            CycleMode::Hover => "Hover",
            CycleMode::Click => "Click",
        }
    }

    pub fn next(self) -> Self {
        match self {
            CycleMode::Always => CycleMode::Hover,
            CycleMode::Hover => CycleMode::Click,
            CycleMode::Click => CycleMode::Always,
        }
    }

    /// Input listeners this mode needs while the billboard is open.
    pub fn listeners(self) -> Listeners {
        match self {
            CycleMode::Always => Listeners::NONE,
            CycleMode::Hover => Listeners {
                pointer_moves: true,
                clicks: false,
            },
            CycleMode::Click => Listeners {
                pointer_moves: false,
                clicks: true,
            },
        }
    }

    /// Parses a configured cycle type, falling back to `Always` on anything unknown.
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|e: ConfigError| {
            error!("[Birthdays] {}. Defaulting to Always.", e);
            CycleMode::Always
        })
    }
}

impl FromStr for CycleMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Always" => Ok(CycleMode::Always),
            "Hover" => Ok(CycleMode::Hover),
            "Click" => Ok(CycleMode::Click),
            other => Err(ConfigError::UnknownCycleType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Listeners {
    pub pointer_moves: bool,
    pub clicks: bool,
}

impl Listeners {
    pub const NONE: Self = Self {
        pointer_moves: false,
        clicks: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleState {
    pub mode: CycleMode,
    pub elapsed_ticks: u32,
}

/// Whether the controller is bound to an open billboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Detached,
    Attached,
}

/// Result of one frame's swap work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapPass {
    pub swapped: Vec<u8>,
    pub failed: Vec<u8>,
}

#[derive(Resource, Debug, Clone)]
pub struct CycleModeController {
    state: CycleState,
    attachment: Attachment,
}

impl Default for CycleModeController {
    fn default() -> Self {
        Self::new(CycleMode::default())
    }
}

impl CycleModeController {
    pub fn new(mode: CycleMode) -> Self {
        Self {
            state: CycleState {
                mode,
                elapsed_ticks: 0,
            },
            attachment: Attachment::Detached,
        }
    }

    pub fn mode(&self) -> CycleMode {
        self.state.mode
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.state.elapsed_ticks
    }

    pub fn attachment(&self) -> Attachment {
        self.attachment
    }

    /// Listeners that are currently subscribed. Nothing while detached.
    pub fn listeners(&self) -> Listeners {
        match self.attachment {
            Attachment::Detached => Listeners::NONE,
            Attachment::Attached => self.state.mode.listeners(),
        }
    }

    /// The billboard opened: subscribe the current mode's listeners.
    pub fn attach(&mut self) {
        self.attachment = Attachment::Attached;
        self.state.elapsed_ticks = 0;
        self.log_listeners("attached");
    }

    /// The billboard closed: drop every listener and the running timer.
    pub fn detach(&mut self) {
        self.attachment = Attachment::Detached;
        self.state.elapsed_ticks = 0;
        self.log_listeners("detached");
    }

    /// Switches mode. The timer restarts and listeners follow the new mode.
    pub fn change_mode(&mut self, mode: CycleMode) {
        let previous = self.state.mode;
        self.state = CycleState {
            mode,
            elapsed_ticks: 0,
        };
        info!("[Birthdays] Cycle mode {:?} -> {:?}", previous, mode);
        self.log_listeners("mode changed");
    }

    /// Applies a raw configuration value, failing soft to `Always`.
    pub fn request_mode(&mut self, raw: &str) -> CycleMode {
        let mode = CycleMode::parse_or_default(raw);
        self.change_mode(mode);
        mode
    }

    fn log_listeners(&self, reason: &str) {
        let listeners = self.listeners();
        debug!(
            "[Birthdays] Listeners {}: pointer moves {}, clicks {}",
            reason, listeners.pointer_moves, listeners.clicks
        );
    }

    /// One frame of pre-draw work against the open billboard.
    ///
    /// Does nothing on the quest board or when the day collection is broken.
    #[allow(clippy::too_many_arguments)]
    pub fn tick<P, S>(
        &mut self,
        panel: &mut P,
        source: &mut S,
        season: Season,
        shared_days: &[u8],
        cycle_duration: u32,
        pointer: &PointerState,
        clicked: &mut ClickedDay,
    ) -> SwapPass
    where
        P: CalendarPanel,
        S: BirthdaySource,
    {
        if panel.is_quest_board() {
            return SwapPass::default();
        }
        if let Err(e) = panel.checked_days() {
            warn!("[Birthdays] Skipping portrait cycle, {}", e);
            return SwapPass::default();
        }

        match self.state.mode {
            CycleMode::Always | CycleMode::Hover => {
                self.state.elapsed_ticks += 1;
                if self.state.elapsed_ticks < cycle_duration.max(1) {
                    return SwapPass::default();
                }
                self.state.elapsed_ticks = 0;

                let targets: Vec<u8> = if self.state.mode == CycleMode::Always {
                    shared_days.to_vec()
                } else {
                    let Some(point) = pointer.0 else {
                        return SwapPass::default();
                    };
                    shared_days
                        .iter()
                        .copied()
                        .filter(|day| panel.slot(*day).is_some_and(|slot| slot.contains_point(point)))
                        .collect()
                };
                swap_days(panel, source, season, &targets)
            }
            CycleMode::Click => {
                let Some(day) = clicked.0.take() else {
                    return SwapPass::default();
                };
                if shared_days.contains(&day) {
                    swap_days(panel, source, season, &[day])
                } else {
                    SwapPass::default()
                }
            }
        }
    }
}

/// Writes the alternate sprite into each day's slot. A day that cannot be
/// resolved is logged and skipped; the rest still swap.
fn swap_days<P, S>(panel: &mut P, source: &mut S, season: Season, days: &[u8]) -> SwapPass
where
    P: CalendarPanel,
    S: BirthdaySource,
{
    let mut pass = SwapPass::default();
    for &day in days {
        match source.sprite(season, day, true) {
            Ok(sprite) => {
                if panel.set_day_sprite(day, sprite) {
                    pass.swapped.push(day);
                } else {
                    warn!("[Birthdays] Billboard has no slot for {:?} {}", season, day);
                    pass.failed.push(day);
                }
            }
            Err(e) => {
                error!(
                    "[Birthdays] Problem resolving the birthday sprite for {:?} {}: {}",
                    season, day, e
                );
                pass.failed.push(day);
            }
        }
    }
    pass
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Pre-draw: swap portraits before the billboard draws its day cells.
pub fn tick_cycle_controller(
    config: Res<BirthdayConfig>,
    shared: Res<SharedDaySet>,
    pointer: Res<PointerState>,
    mut clicked: ResMut<ClickedDay>,
    mut controller: ResMut<CycleModeController>,
    mut registry: ResMut<BirthdayRegistry>,
    mut panels: Query<&mut Billboard>,
) {
    let Ok(mut billboard) = panels.get_single_mut() else {
        return;
    };
    let pass = controller.tick(
        &mut *billboard,
        &mut *registry,
        shared.season,
        &shared.days,
        config.cycle_duration,
        &pointer,
        &mut clicked,
    );
    if !pass.swapped.is_empty() {
        debug!("[Birthdays] Swapped portraits for days {:?}", pass.swapped);
    }
}

/// Applies mode changes coming from configuration. Runs ahead of the
/// billboard's input listeners, so input captured under the old mode never
/// reaches the new one.
pub fn apply_mode_change_requests(
    mut requests: EventReader<CycleModeChangeRequest>,
    mut controller: ResMut<CycleModeController>,
    mut config: ResMut<BirthdayConfig>,
    mut pointer: ResMut<PointerState>,
    mut clicked: ResMut<ClickedDay>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for request in requests.read() {
        let mode = controller.request_mode(&request.cycle_type);
        pointer.set_if_neq(PointerState::default());
        clicked.set_if_neq(ClickedDay::default());
        config.cycle_type = mode.as_str().to_string();
        toasts.send(ToastEvent {
            message: format!("Birthday cycling: {}", mode.as_str()),
            duration_secs: 2.0,
        });
    }
}

/// The cycle-mode key asks for the next mode through the same request path.
pub fn request_next_mode_on_hotkey(
    player_input: Res<PlayerInput>,
    controller: Res<CycleModeController>,
    mut requests: EventWriter<CycleModeChangeRequest>,
) {
    if player_input.cycle_mode {
        requests.send(CycleModeChangeRequest {
            cycle_type: controller.mode().next().as_str().to_string(),
        });
    }
}
