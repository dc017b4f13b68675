//! Shared components, resources, events, and states for the billboard.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::BitOr;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    /// The town billboard is the active menu (calendar or quest board view).
    Billboard,
}

/// Per-frame ordering while the billboard is open:
/// input → pre-draw mutation → host draw → overlay record → overlay present.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillboardFrame {
    Input,
    PreDraw,
    HostDraw,
    Overlay,
    Present,
}

// ═══════════════════════════════════════════════════════════════════════
// CALENDAR
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub year: u32,
    pub season: Season,
    pub day: u8, // 1-28
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            year: 1,
            season: Season::Spring,
            day: 1,
        }
    }
}

/// Independent event markers for one calendar day. Several can be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DayEventFlags(u8);

impl DayEventFlags {
    pub const PASSIVE_FESTIVAL: Self = Self(1 << 0);
    pub const FESTIVAL: Self = Self(1 << 1);
    pub const FISHING_DERBY: Self = Self(1 << 2);
    pub const WEDDING: Self = Self(1 << 3);
    pub const BOOKSELLER: Self = Self(1 << 4);

    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for DayEventFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayEvents {
    pub flags: DayEventFlags,
    /// Passive festivals that the player has not unlocked yet draw dimmed.
    pub passive_festival_locked: bool,
    /// Display names shown in the billboard tooltip (festival names etc).
    pub labels: Vec<String>,
}

/// Non-birthday events per (season, day), populated by the data layer.
#[derive(Resource, Debug, Clone, Default)]
pub struct CalendarEventTable {
    pub days: HashMap<(Season, u8), DayEvents>,
}

impl CalendarEventTable {
    pub fn get(&self, season: Season, day: u8) -> Option<&DayEvents> {
        self.days.get(&(season, day))
    }

    pub fn add(&mut self, season: Season, day: u8, flag: DayEventFlags, label: impl Into<String>) {
        let entry = self.days.entry((season, day)).or_default();
        entry.flags.insert(flag);
        entry.labels.push(label.into());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NPCs
// ═══════════════════════════════════════════════════════════════════════

pub type NpcId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDef {
    pub id: NpcId,
    pub name: String,
    pub birthday_season: Season,
    pub birthday_day: u8,
    pub portrait_index: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct NpcRegistry {
    pub npcs: HashMap<NpcId, NpcDef>,
}

impl NpcRegistry {
    pub fn insert(&mut self, npc: NpcDef) {
        self.npcs.insert(npc.id.clone(), npc);
    }

    /// NPCs born on the given day, ordered by id so callers see a stable order.
    pub fn birthdays_on(&self, season: Season, day: u8) -> Vec<&NpcDef> {
        let mut npcs: Vec<&NpcDef> = self
            .npcs
            .values()
            .filter(|npc| npc.birthday_season == season && npc.birthday_day == day)
            .collect();
        npcs.sort_by(|a, b| a.id.cmp(&b.id));
        npcs
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BILLBOARD: the host calendar panel
// ═══════════════════════════════════════════════════════════════════════

/// Texture sheets the billboard and its overlay draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteSheet {
    Billboard,
    Cursors,
    CursorsExtra,
    Portraits,
    BirthdayIcon,
}

/// Loaded texture handles for each sheet, filled at startup by the UI layer.
#[derive(Resource, Debug, Clone, Default)]
pub struct SheetHandles {
    pub sheets: HashMap<SpriteSheet, Handle<Image>>,
}

impl SheetHandles {
    pub fn get(&self, sheet: SpriteSheet) -> Option<Handle<Image>> {
        self.sheets.get(&sheet).cloned()
    }
}

/// A region of a sprite sheet shown in a day slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySprite {
    pub sheet: SpriteSheet,
    pub source: URect,
}

impl DaySprite {
    /// Head portrait frame `frame` of the NPC portrait sheet.
    pub fn portrait(frame: u32) -> Self {
        let x = (frame % PORTRAIT_COLUMNS) * PORTRAIT_WIDTH;
        let y = (frame / PORTRAIT_COLUMNS) * PORTRAIT_HEIGHT;
        Self {
            sheet: SpriteSheet::Portraits,
            source: URect::new(x, y, x + PORTRAIT_WIDTH, y + PORTRAIT_HEIGHT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillboardView {
    #[default]
    Calendar,
    QuestBoard,
}

/// One cell of the billboard calendar grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySlot {
    pub day: u8,
    /// Screen rectangle in UI pixels. Fixed while the billboard is open.
    pub bounds: IRect,
    /// The sprite the billboard draws for this day.
    pub sprite: Option<DaySprite>,
    pub events: DayEvents,
    pub hover_text: String,
}

impl DaySlot {
    pub fn new(day: u8, bounds: IRect) -> Self {
        Self {
            day,
            bounds,
            sprite: None,
            events: DayEvents::default(),
            hover_text: String::new(),
        }
    }

    /// Half-open containment: the right and bottom edges belong to the neighbour.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let (x, y) = (point.x.floor() as i32, point.y.floor() as i32);
        x >= self.bounds.min.x && x < self.bounds.max.x && y >= self.bounds.min.y && y < self.bounds.max.y
    }
}

/// Screen rectangle of `day` (1-based) for a billboard whose top-left is `origin`.
pub fn day_slot_bounds(origin: IVec2, day: u8) -> IRect {
    let cell = (day.max(1) - 1) as i32;
    let col = cell % DAYS_PER_WEEK;
    let row = cell / DAYS_PER_WEEK;
    let min = origin + DAY_GRID_OFFSET + IVec2::new(col * DAY_SLOT_STRIDE, row * DAY_SLOT_STRIDE);
    IRect::from_corners(min, min + IVec2::splat(DAY_SLOT_SIZE))
}

/// The billboard menu. Host-owned: the birthday overlay only ever writes
/// day sprites through [`Billboard::set_day_sprite`].
#[derive(Component, Debug, Clone)]
pub struct Billboard {
    days: Option<Vec<DaySlot>>,
    view: BillboardView,
    hover_text: String,
    cursor: Vec2,
    pulse: f32,
}

impl Billboard {
    pub fn new(days: Vec<DaySlot>) -> Self {
        Self {
            days: Some(days),
            view: BillboardView::Calendar,
            hover_text: String::new(),
            cursor: Vec2::ZERO,
            pulse: 0.0,
        }
    }

    /// A billboard whose day collection was never built.
    pub fn without_days() -> Self {
        Self {
            days: None,
            ..Self::new(Vec::new())
        }
    }

    /// Standard 28-day calendar grid with empty slots.
    pub fn calendar(origin: IVec2) -> Self {
        let days = (1..=DAYS_PER_SEASON)
            .map(|day| DaySlot::new(day, day_slot_bounds(origin, day)))
            .collect();
        Self::new(days)
    }

    pub fn days(&self) -> Option<&[DaySlot]> {
        self.days.as_deref()
    }

    pub fn day(&self, day: u8) -> Option<&DaySlot> {
        self.days()?.iter().find(|slot| slot.day == day)
    }

    /// Replaces the sprite drawn for `day`. Returns false if the slot does not exist.
    pub fn set_day_sprite(&mut self, day: u8, sprite: DaySprite) -> bool {
        let Some(slot) = self
            .days
            .as_mut()
            .and_then(|days| days.iter_mut().find(|slot| slot.day == day))
        else {
            return false;
        };
        slot.sprite = Some(sprite);
        true
    }

    pub fn view(&self) -> BillboardView {
        self.view
    }

    pub fn set_view(&mut self, view: BillboardView) {
        self.view = view;
    }

    /// Tooltip the billboard is currently showing (empty when none).
    pub fn hover_text(&self) -> &str {
        &self.hover_text
    }

    pub fn set_hover_text(&mut self, text: impl Into<String>) {
        self.hover_text = text.into();
    }

    /// Software cursor position in UI pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Vec2) {
        self.cursor = cursor;
    }

    /// Bounce offset (0..=8 px) used by badge and highlight animations.
    pub fn pulse(&self) -> f32 {
        self.pulse
    }

    pub fn set_pulse(&mut self, pulse: f32) {
        self.pulse = pulse;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Game actions for the current frame. Reset every PreUpdate.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub open_calendar: bool,
    pub toggle_quest_board: bool,
    pub sleep: bool,
    pub cycle_mode: bool,
    pub ui_cancel: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub open_calendar: KeyCode,
    pub toggle_quest_board: KeyCode,
    pub sleep: KeyCode,
    pub cycle_mode: KeyCode,
    pub ui_cancel: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            open_calendar: KeyCode::KeyC,
            toggle_quest_board: KeyCode::KeyQ,
            sleep: KeyCode::KeyB,
            cycle_mode: KeyCode::F6,
            ui_cancel: KeyCode::Escape,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    #[default]
    Disabled,
    Gameplay,
    Menu,
}

/// Cursor moved, in logical window pixels.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerMoved {
    pub position: Vec2,
}

/// Mouse button pressed while the cursor was at `position` (logical window pixels).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PointerPressed {
    pub position: Vec2,
    pub button: MouseButton,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct DayEndEvent {
    pub day: u8,
    pub season: Season,
    pub year: u32,
}

#[derive(Event, Debug, Clone)]
pub struct SeasonChangeEvent {
    pub new_season: Season,
    pub year: u32,
}

/// Raw cycle type string from configuration ("Always", "Hover", "Click").
#[derive(Event, Debug, Clone)]
pub struct CycleModeChangeRequest {
    pub cycle_type: String,
}

/// The birthday data behind the billboard changed; cached day sets are stale.
#[derive(Event, Debug, Clone, Default)]
pub struct BirthdayEventsChanged;

/// Toast notification for player feedback.
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

/// Source-pixel to UI-pixel magnification of all billboard art.
pub const PIXEL_ZOOM: f32 = 4.0;

pub const DAYS_PER_SEASON: u8 = 28;
pub const DAYS_PER_WEEK: i32 = 7;

pub const BILLBOARD_WIDTH: f32 = 1352.0;
pub const BILLBOARD_HEIGHT: f32 = 792.0;
pub const DAY_GRID_OFFSET: IVec2 = IVec2::new(152, 200);
pub const DAY_SLOT_SIZE: i32 = 124;
pub const DAY_SLOT_STRIDE: i32 = 128;

pub const PORTRAIT_COLUMNS: u32 = 8;
pub const PORTRAIT_ROWS: u32 = 8;
pub const PORTRAIT_WIDTH: u32 = 16;
pub const PORTRAIT_HEIGHT: u32 = 24;
