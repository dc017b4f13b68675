//! Redraws shared birthday days on top of the billboard: clean background,
//! selected portrait, event badges, past/today marks and the multi-birthday
//! icon. Output is a list of draw commands for the UI layer to present.

use bevy::asset::LoadState;
use bevy::prelude::*;

use super::config::BirthdayConfig;
use super::panel::{CalendarPanel, PanelError};
use super::SharedDaySet;
use crate::shared::*;

pub const ICON_PATH: &str = "ui/birthday_icon.png";

/// Portrait offset inside a day slot, in UI pixels.
const PORTRAIT_OFFSET: Vec2 = Vec2::new(48.0, 28.0);
/// Badges are drawn with a drop shadow this far down-left.
const SHADOW_OFFSET: Vec2 = Vec2::new(-4.0, 4.0);
const HOVER_TEXT_OFFSET: Vec2 = Vec2::new(32.0, 32.0);

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill {
        rect: Rect,
        color: Color,
    },
    Sprite {
        sheet: SpriteSheet,
        /// `None` draws the whole image.
        source: Option<URect>,
        rect: Rect,
        tint: Color,
    },
    Border {
        rect: Rect,
        thickness: f32,
        color: Color,
    },
    Cursor {
        position: Vec2,
    },
    HoverText {
        text: String,
        position: Vec2,
    },
}

pub trait SpriteBatch {
    fn draw(&mut self, command: DrawCommand);
}

/// Commands recorded this frame, in back-to-front order.
#[derive(Resource, Debug, Clone, Default)]
pub struct OverlayDrawList {
    pub commands: Vec<DrawCommand>,
}

impl SpriteBatch for OverlayDrawList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Loading,
    Ready(UVec2),
    /// Stays failed for the rest of the session.
    Failed,
}

#[derive(Resource, Debug, Clone)]
pub struct BirthdayIcon {
    pub handle: Handle<Image>,
    pub state: IconState,
}

impl Default for BirthdayIcon {
    fn default() -> Self {
        Self {
            handle: Handle::default(),
            state: IconState::Loading,
        }
    }
}

impl BirthdayIcon {
    pub fn ready(size: UVec2) -> Self {
        Self {
            state: IconState::Ready(size),
            ..default()
        }
    }

    /// Native size once loaded.
    pub fn size(&self) -> Option<UVec2> {
        match self.state {
            IconState::Ready(size) => Some(size),
            IconState::Loading | IconState::Failed => None,
        }
    }
}

/// Frame-independent inputs to the overlay.
#[derive(Debug, Clone)]
pub struct OverlayContext<'a> {
    /// Current day of the month in the game calendar.
    pub today: u8,
    pub shared_days: &'a [u8],
    /// Real seconds since startup; drives badge animation.
    pub elapsed_secs: f64,
    /// Native icon size, or `None` when the icon must not be drawn.
    pub icon_size: Option<UVec2>,
}

/// Festival flag animation frame (0..6), advancing every 100 ms.
pub fn festival_frame(elapsed_secs: f64) -> u32 {
    ((elapsed_secs * 1000.0) % 600.0 / 100.0) as u32
}

/// Bookseller badge bob offset for `day`. Each day runs at its own phase.
pub fn bookseller_bob(elapsed_secs: f64, day: u8) -> Vec2 {
    let t = elapsed_secs + (day as f64 - 1.0) * 0.3;
    Vec2::new(-2.0 * (t * 3.0).sin() as f32, -2.0 * (t * 2.0).cos() as f32)
}

/// Billboard background tile for a grid position.
pub fn background_source(day: u8) -> URect {
    let cell = day.max(1) as u32 - 1;
    let x = 38 + (cell % 7) * 32;
    let y = 248 + (cell / 7) * 32;
    URect::new(x, y, x + 31, y + 31)
}

fn magnified(source: URect, at: Vec2) -> Rect {
    Rect::from_corners(at, at + source.size().as_vec2() * PIXEL_ZOOM)
}

fn sprite(batch: &mut impl SpriteBatch, sheet: SpriteSheet, source: URect, at: Vec2, tint: Color) {
    batch.draw(DrawCommand::Sprite {
        sheet,
        source: Some(source),
        rect: magnified(source, at),
        tint,
    });
}

fn sprite_with_shadow(batch: &mut impl SpriteBatch, sheet: SpriteSheet, source: URect, at: Vec2, tint: Color) {
    sprite(batch, sheet, source, at + SHADOW_OFFSET, Color::srgba(0.0, 0.0, 0.0, 0.35));
    sprite(batch, sheet, source, at, tint);
}

/// Records the overlay for every shared day, then the cursor and tooltip on top.
///
/// Nothing is recorded when the day collection is broken.
pub fn draw_shared_days(
    batch: &mut impl SpriteBatch,
    panel: &impl CalendarPanel,
    ctx: &OverlayContext,
) -> Result<(), PanelError> {
    panel.checked_days()?;

    for &day in ctx.shared_days {
        let Some(slot) = panel.slot(day) else {
            continue;
        };
        draw_day(batch, slot, panel.pulse(), ctx);
    }

    batch.draw(DrawCommand::Cursor {
        position: panel.cursor(),
    });
    let text = panel.hover_text();
    if !text.is_empty() {
        batch.draw(DrawCommand::HoverText {
            text: text.to_string(),
            position: panel.cursor() + HOVER_TEXT_OFFSET,
        });
    }
    Ok(())
}

fn draw_day(batch: &mut impl SpriteBatch, slot: &DaySlot, pulse: f32, ctx: &OverlayContext) {
    let bounds = slot.bounds.as_rect();
    let origin = bounds.min;
    let day = slot.day;

    // Clean base.
    batch.draw(DrawCommand::Fill {
        rect: bounds,
        color: Color::BLACK,
    });
    batch.draw(DrawCommand::Sprite {
        sheet: SpriteSheet::Billboard,
        source: Some(background_source(day)),
        rect: bounds,
        tint: Color::WHITE,
    });

    if let Some(portrait) = slot.sprite {
        sprite(batch, portrait.sheet, portrait.source, origin + PORTRAIT_OFFSET, Color::WHITE);
    }

    let flags = slot.events.flags;
    let bounce = pulse / 2.0;
    if flags.contains(DayEventFlags::PASSIVE_FESTIVAL) {
        let tint = if slot.events.passive_festival_locked {
            Color::srgba(0.0, 0.0, 0.0, 0.3)
        } else {
            Color::WHITE
        };
        sprite_with_shadow(
            batch,
            SpriteSheet::Cursors,
            URect::new(346, 392, 354, 400),
            origin + Vec2::new(12.0, 60.0 - bounce),
            tint,
        );
    }
    if flags.contains(DayEventFlags::FESTIVAL) {
        let x = 1 + festival_frame(ctx.elapsed_secs) * 14;
        sprite_with_shadow(
            batch,
            SpriteSheet::Billboard,
            URect::new(x, 398, x + 14, 410),
            origin + Vec2::new(40.0, 56.0 - bounce),
            Color::WHITE,
        );
    }
    if flags.contains(DayEventFlags::FISHING_DERBY) {
        sprite_with_shadow(
            batch,
            SpriteSheet::CursorsExtra,
            URect::new(103, 2, 113, 13),
            origin + Vec2::new(8.0, 60.0 - bounce),
            Color::WHITE,
        );
    }
    if flags.contains(DayEventFlags::WEDDING) {
        sprite(
            batch,
            SpriteSheet::CursorsExtra,
            URect::new(112, 32, 128, 46),
            Vec2::new(bounds.max.x - 56.0, bounds.min.y - 12.0),
            Color::WHITE,
        );
    }
    if flags.contains(DayEventFlags::BOOKSELLER) {
        let bob = bookseller_bob(ctx.elapsed_secs, day);
        sprite(
            batch,
            SpriteSheet::CursorsExtra,
            URect::new(71, 63, 79, 78),
            Vec2::new(bounds.max.x - 72.0, bounds.min.y + 52.0) + bob,
            Color::WHITE,
        );
    }

    if ctx.today > day {
        batch.draw(DrawCommand::Fill {
            rect: bounds,
            color: Color::srgba(0.5, 0.5, 0.5, 0.25),
        });
    } else if ctx.today == day {
        let grow = (4.0 * pulse / 8.0).floor();
        batch.draw(DrawCommand::Border {
            rect: bounds.inflate(grow),
            thickness: PIXEL_ZOOM,
            color: Color::srgb(0.0, 0.0, 1.0),
        });
    }

    if let Some(native) = ctx.icon_size {
        let size = native.as_vec2() * PIXEL_ZOOM;
        batch.draw(DrawCommand::Sprite {
            sheet: SpriteSheet::BirthdayIcon,
            source: None,
            rect: Rect::from_corners(bounds.max - size, bounds.max),
            tint: Color::WHITE,
        });
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn load_birthday_icon(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(BirthdayIcon {
        handle: asset_server.load(ICON_PATH),
        state: IconState::Loading,
    });
}

/// Next icon state given what the asset side reports this frame.
/// `Ready` and `Failed` are final.
pub fn next_icon_state(current: IconState, loaded_size: Option<UVec2>, load_failed: bool) -> IconState {
    match (current, loaded_size) {
        (IconState::Loading, Some(size)) => IconState::Ready(size),
        (IconState::Loading, None) if load_failed => IconState::Failed,
        (state, _) => state,
    }
}

/// Resolves the icon's load state once; a failure disables the icon for good.
pub fn watch_birthday_icon(
    mut icon: ResMut<BirthdayIcon>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
) {
    if icon.state != IconState::Loading {
        return;
    }
    let loaded_size = images.get(&icon.handle).map(|image| image.size());
    let failure = match asset_server.get_load_state(icon.handle.id()) {
        Some(LoadState::Failed(err)) => Some(err),
        _ => None,
    };

    let next = next_icon_state(icon.state, loaded_size, failure.is_some());
    match (next, failure) {
        (IconState::Ready(size), _) => {
            info!("[Birthdays] Icon {} loaded ({}x{})", ICON_PATH, size.x, size.y);
        }
        (IconState::Failed, Some(err)) => {
            error!("[Birthdays] Failed loading the icon {}: {}", ICON_PATH, err);
        }
        _ => return,
    }
    icon.state = next;
}

/// Overlay: record this frame's draw commands after the billboard has drawn.
pub fn record_overlay(
    config: Res<BirthdayConfig>,
    calendar: Res<Calendar>,
    shared: Res<SharedDaySet>,
    icon: Res<BirthdayIcon>,
    time: Res<Time<Real>>,
    panels: Query<&Billboard>,
    mut draw_list: ResMut<OverlayDrawList>,
) {
    draw_list.commands.clear();

    let Ok(billboard) = panels.get_single() else {
        return;
    };
    if billboard.is_quest_board() || shared.days.is_empty() {
        return;
    }

    let ctx = OverlayContext {
        today: calendar.day,
        shared_days: &shared.days,
        elapsed_secs: time.elapsed_secs_f64(),
        icon_size: if config.show_icon { icon.size() } else { None },
    };
    if let Err(e) = draw_shared_days(&mut *draw_list, billboard, &ctx) {
        warn!("[Birthdays] Skipping overlay draw, {}", e);
    }
}
