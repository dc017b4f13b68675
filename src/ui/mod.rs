mod billboard;
mod hud;
mod toast;

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use crate::shared::*;

pub use billboard::{billboard_origin, build_billboard, day_hover_text, fit_ui_scale};

/// Font shared by every UI text node. The default handle is Bevy's built-in font.
#[derive(Resource, Debug, Clone, Default)]
pub struct UiFontHandle(pub Handle<Font>);

const SHEET_PATHS: [(SpriteSheet, &str); 4] = [
    (SpriteSheet::Billboard, "ui/billboard.png"),
    (SpriteSheet::Cursors, "ui/cursors.png"),
    (SpriteSheet::CursorsExtra, "ui/cursors_extra.png"),
    (SpriteSheet::Portraits, "portraits/townsfolk.png"),
];

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UiFontHandle>()
            .init_resource::<SheetHandles>();

        app.add_systems(
            Startup,
            (load_sheets, toast::spawn_toast_container, refit_ui_scale),
        );

        // ─── ALWAYS ───
        app.add_systems(
            Update,
            (
                fit_ui_scale_on_resize,
                toast::wire_season_toasts,
                toast::handle_toast_events,
                toast::update_toasts,
            )
                .chain(),
        );

        // ─── HUD: visible during Playing state ───
        app.add_systems(OnEnter(GameState::Playing), hud::spawn_hud);
        app.add_systems(OnExit(GameState::Playing), hud::despawn_hud);
        app.add_systems(
            Update,
            (hud::update_date_display, billboard::open_billboard)
                .run_if(in_state(GameState::Playing)),
        );

        // ─── BILLBOARD ───
        app.add_systems(OnEnter(GameState::Billboard), billboard::spawn_billboard);
        app.add_systems(
            OnExit(GameState::Billboard),
            (billboard::despawn_billboard, refit_ui_scale),
        );
        app.add_systems(
            Update,
            billboard::billboard_navigation.in_set(BillboardFrame::Input),
        );
        app.add_systems(
            Update,
            (
                billboard::update_billboard_hover,
                billboard::animate_pulse,
                billboard::sync_billboard_view,
                billboard::sync_day_cells,
                billboard::sync_cursor_and_tooltip,
            )
                .chain()
                .in_set(BillboardFrame::HostDraw),
        );
    }
}

fn load_sheets(asset_server: Res<AssetServer>, mut sheets: ResMut<SheetHandles>) {
    for (sheet, path) in SHEET_PATHS {
        sheets.sheets.insert(sheet, asset_server.load(path));
    }
    info!("[UI] Requested {} sprite sheets", sheets.sheets.len());
}

fn apply_fit(window: &Window, ui_scale: &mut UiScale) {
    let scale = fit_ui_scale(Vec2::new(window.width(), window.height()));
    if (ui_scale.0 - scale).abs() > f32::EPSILON {
        ui_scale.0 = scale;
        debug!("[UI] UiScale set to {:.3}", scale);
    }
}

fn refit_ui_scale(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut ui_scale: ResMut<UiScale>,
) {
    if let Ok(window) = windows.get_single() {
        apply_fit(window, &mut ui_scale);
    }
}

/// Day slot bounds are fixed while the billboard is open, so the scale only
/// follows the window while it is closed.
fn fit_ui_scale_on_resize(
    mut resized: EventReader<WindowResized>,
    state: Res<State<GameState>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut ui_scale: ResMut<UiScale>,
) {
    if resized.read().last().is_none() || *state.get() == GameState::Billboard {
        return;
    }
    if let Ok(window) = windows.get_single() {
        apply_fit(window, &mut ui_scale);
    }
}
