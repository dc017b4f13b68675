//! Headless integration tests for the birthday billboard.
//!
//! These tests exercise the ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic systems (skipping all rendering/UI), and verify that the
//! portrait cycling works frame by frame.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use birthday_billboard::birthdays::config::BirthdayConfig;
use birthday_billboard::birthdays::controller::{
    apply_mode_change_requests, tick_cycle_controller, CycleMode, CycleModeController,
};
use birthday_billboard::birthdays::overlay::{
    record_overlay, BirthdayIcon, DrawCommand, OverlayDrawList,
};
use birthday_billboard::birthdays::present::{present_overlay, spawn_overlay_root, OverlayRoot};
use birthday_billboard::birthdays::registry::{BirthdayRegistry, BirthdaySource};
use birthday_billboard::birthdays::tracker::{track_clicks, track_pointer_moves, ClickedDay, PointerState};
use birthday_billboard::birthdays::{
    attach_controller, click_listener_subscribed, detach_controller,
    mark_birthdays_stale_on_season_change, pointer_listener_subscribed,
    prepare_opened_billboard, refresh_shared_days, SharedDaySet,
};
use birthday_billboard::calendar::CalendarPlugin;
use birthday_billboard::data::DataPlugin;
use birthday_billboard::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources and events registered
/// but NO rendering, windowing, or asset loading. Systems must be added
/// per-test depending on what's being exercised.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<Calendar>()
        .init_resource::<NpcRegistry>()
        .init_resource::<CalendarEventTable>()
        .init_resource::<PlayerInput>()
        .init_resource::<KeyBindings>()
        .init_resource::<InputContext>()
        .insert_resource(UiScale(1.0));

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<DayEndEvent>()
        .add_event::<SeasonChangeEvent>()
        .add_event::<PointerMoved>()
        .add_event::<PointerPressed>()
        .add_event::<CycleModeChangeRequest>()
        .add_event::<BirthdayEventsChanged>()
        .add_event::<ToastEvent>();

    app
}

/// The birthday systems wired the way `BirthdayPlugin` wires them, minus the
/// asset-backed icon loading.
fn add_birthday_systems(app: &mut App, mode: CycleMode, cycle_duration: u32) {
    app.insert_resource(BirthdayConfig {
        cycle_duration,
        cycle_type: mode.as_str().to_string(),
        show_icon: true,
    })
    .insert_resource(CycleModeController::new(mode))
    .init_resource::<BirthdayRegistry>()
    .init_resource::<SharedDaySet>()
    .init_resource::<PointerState>()
    .init_resource::<ClickedDay>()
    .init_resource::<OverlayDrawList>()
    .insert_resource(BirthdayIcon::ready(UVec2::new(9, 9)));

    app.configure_sets(
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
    );
    app.add_systems(OnEnter(GameState::Billboard), attach_controller)
        .add_systems(OnExit(GameState::Billboard), detach_controller)
        .add_systems(
            Update,
            (
                apply_mode_change_requests.before(BillboardFrame::Input),
                (mark_birthdays_stale_on_season_change, refresh_shared_days)
                    .chain()
                    .before(BillboardFrame::Input),
            ),
        )
        .add_systems(
            Update,
            (
                track_pointer_moves.run_if(pointer_listener_subscribed),
                track_clicks.run_if(click_listener_subscribed),
            )
                .in_set(BillboardFrame::Input),
        )
        .add_systems(
            Update,
            (prepare_opened_billboard, tick_cycle_controller)
                .chain()
                .in_set(BillboardFrame::PreDraw),
        )
        .add_systems(Update, record_overlay.in_set(BillboardFrame::Overlay));
}

fn npc(id: &str, season: Season, day: u8, portrait_index: u32) -> NpcDef {
    NpcDef {
        id: id.into(),
        name: id.to_uppercase(),
        birthday_season: season,
        birthday_day: day,
        portrait_index,
    }
}

/// Spring 3 and 10 are shared, Spring 5 is a single birthday.
fn seed_town(app: &mut App) {
    let mut npcs = app.world_mut().resource_mut::<NpcRegistry>();
    npcs.insert(npc("hazel", Season::Spring, 3, 11));
    npcs.insert(npc("pip", Season::Spring, 3, 10));
    npcs.insert(npc("bram", Season::Spring, 10, 12));
    npcs.insert(npc("juniper", Season::Spring, 10, 13));
    npcs.insert(npc("wren", Season::Spring, 5, 15));
}

fn open_billboard(app: &mut App, billboard: Billboard) -> Entity {
    let entity = app.world_mut().spawn(billboard).id();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Billboard);
    app.update();
    entity
}

fn sprite_of(app: &App, entity: Entity, day: u8) -> Option<DaySprite> {
    app.world()
        .get::<Billboard>(entity)
        .and_then(|b| b.day(day))
        .and_then(|slot| slot.sprite)
}

fn day_centre(app: &App, entity: Entity, day: u8) -> Vec2 {
    app.world()
        .get::<Billboard>(entity)
        .and_then(|b| b.day(day))
        .map(|slot| slot.bounds.center().as_vec2())
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Opening the billboard
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_open_sets_primary_sprites_and_shared_days() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 120);

    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let shared = app.world().resource::<SharedDaySet>();
    assert_eq!(shared.season, Season::Spring);
    assert_eq!(shared.days, vec![3, 10]);

    // Entries are ordered by id: hazel before pip, bram before juniper.
    assert_eq!(sprite_of(&app, board, 3), Some(DaySprite::portrait(11)));
    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(12)));
    assert_eq!(sprite_of(&app, board, 5), Some(DaySprite::portrait(15)));
    assert_eq!(sprite_of(&app, board, 4), None);

    let controller = app.world().resource::<CycleModeController>();
    assert!(controller.listeners().clicks);
}

#[test]
fn test_closing_detaches_and_forgets_pointer() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Hover, 120);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let centre = day_centre(&app, board, 10);
    app.world_mut().send_event(PointerMoved { position: centre });
    app.update();
    assert_eq!(app.world().resource::<PointerState>().0, Some(centre));

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();

    assert_eq!(app.world().resource::<PointerState>().0, None);
    let controller = app.world().resource::<CycleModeController>();
    assert!(!controller.listeners().pointer_moves);
    assert!(!controller.listeners().clicks);
    assert!(app.world().resource::<OverlayDrawList>().commands.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Always mode
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_always_mode_swaps_every_shared_day_each_period() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Always, 1);

    // The opening frame sets primaries, then the first tick already swaps.
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));
    assert_eq!(sprite_of(&app, board, 3), Some(DaySprite::portrait(10)));
    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(13)));
    assert_eq!(sprite_of(&app, board, 5), Some(DaySprite::portrait(15)));

    app.update();
    assert_eq!(sprite_of(&app, board, 3), Some(DaySprite::portrait(11)));
    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(12)));
    assert_eq!(sprite_of(&app, board, 5), Some(DaySprite::portrait(15)));
}

#[test]
fn test_always_mode_waits_for_cycle_duration() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Always, 3);

    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));
    app.update();
    assert_eq!(sprite_of(&app, board, 3), Some(DaySprite::portrait(11)));
    assert_eq!(app.world().resource::<CycleModeController>().elapsed_ticks(), 2);

    app.update();
    assert_eq!(sprite_of(&app, board, 3), Some(DaySprite::portrait(10)));
    assert_eq!(app.world().resource::<CycleModeController>().elapsed_ticks(), 0);
}

#[test]
fn test_quest_board_view_pauses_cycling() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Always, 1);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));
    let before = sprite_of(&app, board, 3);

    if let Some(mut billboard) = app.world_mut().get_mut::<Billboard>(board) {
        billboard.set_view(BillboardView::QuestBoard);
    }
    app.update();
    app.update();

    assert_eq!(sprite_of(&app, board, 3), before);
    assert!(app.world().resource::<OverlayDrawList>().commands.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Hover mode
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_hover_mode_swaps_only_the_hovered_day() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Hover, 1);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    // No pointer yet: nothing moved on the opening frame.
    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(12)));

    let centre = day_centre(&app, board, 10);
    app.world_mut().send_event(PointerMoved { position: centre });
    app.update();

    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(13)));
    assert_eq!(sprite_of(&app, board, 3), Some(DaySprite::portrait(11)));
}

#[test]
fn test_hover_mode_converts_window_pixels_with_ui_scale() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Hover, 1);
    app.insert_resource(UiScale(0.5));
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    // Day 10's centre in UI pixels lands at half that in the window.
    let centre = day_centre(&app, board, 10);
    app.world_mut().send_event(PointerMoved {
        position: centre * 0.5,
    });
    app.update();

    assert_eq!(app.world().resource::<PointerState>().0, Some(centre));
    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(13)));
}

#[test]
fn test_repeated_pointer_moves_keep_the_same_state() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Hover, 120);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let centre = day_centre(&app, board, 3);
    for _ in 0..3 {
        app.world_mut().send_event(PointerMoved { position: centre });
        app.update();
        assert_eq!(app.world().resource::<PointerState>().0, Some(centre));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Click mode
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_click_mode_swaps_clicked_shared_day() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 120);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let centre = day_centre(&app, board, 10);
    app.world_mut().send_event(PointerPressed {
        position: centre,
        button: MouseButton::Left,
    });
    app.update();

    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(13)));
    assert_eq!(sprite_of(&app, board, 3), Some(DaySprite::portrait(11)));
    assert_eq!(app.world().resource::<ClickedDay>().0, None);

    // Nothing more happens without another click.
    app.update();
    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(13)));
}

#[test]
fn test_click_on_single_birthday_day_does_nothing() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 120);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let centre = day_centre(&app, board, 5);
    app.world_mut().send_event(PointerPressed {
        position: centre,
        button: MouseButton::Left,
    });
    app.update();

    assert_eq!(sprite_of(&app, board, 5), Some(DaySprite::portrait(15)));
    assert_eq!(app.world().resource::<ClickedDay>().0, None);
}

#[test]
fn test_right_click_is_ignored() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 120);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let centre = day_centre(&app, board, 10);
    app.world_mut().send_event(PointerPressed {
        position: centre,
        button: MouseButton::Right,
    });
    app.update();

    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(12)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Broken billboard
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_short_day_collection_is_left_alone() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 1);

    let mut days = Billboard::calendar(IVec2::ZERO)
        .days()
        .unwrap_or_default()
        .to_vec();
    days.truncate(27);
    let centre = days[9].bounds.center().as_vec2();
    let board = open_billboard(&mut app, Billboard::new(days));

    app.world_mut().send_event(PointerPressed {
        position: centre,
        button: MouseButton::Left,
    });
    app.update();

    assert_eq!(app.world().resource::<ClickedDay>().0, None);
    assert_eq!(sprite_of(&app, board, 10), None);
    assert_eq!(sprite_of(&app, board, 3), None);
    assert!(app.world().resource::<OverlayDrawList>().commands.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlay recording
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_overlay_records_shared_days_then_cursor_on_top() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 120);
    let _board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let commands = app.world().resource::<OverlayDrawList>().commands.clone();
    assert!(!commands.is_empty());
    assert!(matches!(commands.last(), Some(DrawCommand::Cursor { .. })));
    let icons = commands
        .iter()
        .filter(|c| {
            matches!(
                c,
                DrawCommand::Sprite {
                    sheet: SpriteSheet::BirthdayIcon,
                    ..
                }
            )
        })
        .count();
    assert_eq!(icons, 2);
}

#[test]
fn test_overlay_hides_icon_when_disabled() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 120);
    app.world_mut().resource_mut::<BirthdayConfig>().show_icon = false;
    let _board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let commands = &app.world().resource::<OverlayDrawList>().commands;
    assert!(!commands.iter().any(|c| matches!(
        c,
        DrawCommand::Sprite {
            sheet: SpriteSheet::BirthdayIcon,
            ..
        }
    )));
}

#[test]
fn test_presenter_builds_one_node_per_drawable_command() {
    let mut app = build_test_app();
    app.init_resource::<SheetHandles>()
        .insert_resource(BirthdayIcon::ready(UVec2::new(9, 9)))
        .insert_resource(OverlayDrawList {
            commands: vec![
                DrawCommand::Fill {
                    rect: Rect::new(0.0, 0.0, 124.0, 124.0),
                    color: Color::BLACK,
                },
                DrawCommand::Sprite {
                    sheet: SpriteSheet::BirthdayIcon,
                    source: None,
                    rect: Rect::new(88.0, 88.0, 124.0, 124.0),
                    tint: Color::WHITE,
                },
                DrawCommand::Border {
                    rect: Rect::new(0.0, 0.0, 124.0, 124.0),
                    thickness: 4.0,
                    color: Color::srgb(1.0, 0.0, 0.0),
                },
                // No cursor sheet is loaded, so this one is skipped.
                DrawCommand::Cursor {
                    position: Vec2::new(40.0, 40.0),
                },
                DrawCommand::HoverText {
                    text: "Pip's Birthday".into(),
                    position: Vec2::new(72.0, 72.0),
                },
            ],
        })
        .add_systems(Startup, spawn_overlay_root)
        .add_systems(Update, present_overlay);

    // The second frame rebuilds the layer instead of stacking on top of it.
    app.update();
    app.update();

    let world = app.world_mut();
    let root = world
        .query_filtered::<Entity, With<OverlayRoot>>()
        .single(world);
    let children = world.get::<Children>(root).map_or(0, |c| c.len());
    assert_eq!(children, 4);
    let global = world.get::<GlobalZIndex>(root).map(|z| z.0);
    assert_eq!(global, Some(20));
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode changes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_mode_change_request_switches_listeners() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Always, 120);
    let _board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    app.world_mut().send_event(CycleModeChangeRequest {
        cycle_type: "Hover".into(),
    });
    app.update();

    let controller = app.world().resource::<CycleModeController>();
    assert_eq!(controller.mode(), CycleMode::Hover);
    assert!(controller.listeners().pointer_moves);
    assert!(!controller.listeners().clicks);
    assert_eq!(app.world().resource::<BirthdayConfig>().cycle_type, "Hover");
}

#[test]
fn test_pending_click_does_not_survive_a_mode_round_trip() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 120);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    // A click on day 10 is waiting when the mode switches away from Click.
    app.world_mut().resource_mut::<ClickedDay>().0 = Some(10);
    app.world_mut().send_event(CycleModeChangeRequest {
        cycle_type: "Always".into(),
    });
    app.update();
    assert_eq!(app.world().resource::<ClickedDay>().0, None);

    app.world_mut().send_event(CycleModeChangeRequest {
        cycle_type: "Click".into(),
    });
    app.update();

    assert_eq!(app.world().resource::<CycleModeController>().mode(), CycleMode::Click);
    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(12)));
}

#[test]
fn test_click_in_the_same_frame_as_a_mode_change_is_not_captured() {
    let mut app = build_test_app();
    seed_town(&mut app);
    add_birthday_systems(&mut app, CycleMode::Click, 120);
    let board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));

    let centre = day_centre(&app, board, 10);
    app.world_mut().send_event(PointerPressed {
        position: centre,
        button: MouseButton::Left,
    });
    app.world_mut().send_event(CycleModeChangeRequest {
        cycle_type: "Always".into(),
    });
    app.update();

    assert_eq!(app.world().resource::<CycleModeController>().mode(), CycleMode::Always);
    assert_eq!(app.world().resource::<ClickedDay>().0, None);
    assert_eq!(sprite_of(&app, board, 10), Some(DaySprite::portrait(12)));
}

#[test]
fn test_unknown_mode_falls_back_to_always() {
    let mut app = build_test_app();
    add_birthday_systems(&mut app, CycleMode::Click, 120);

    app.world_mut().send_event(CycleModeChangeRequest {
        cycle_type: "Sideways".into(),
    });
    app.update();

    assert_eq!(app.world().resource::<CycleModeController>().mode(), CycleMode::Always);
    assert_eq!(app.world().resource::<BirthdayConfig>().cycle_type, "Always");
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar and data
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sleeping_into_a_new_season_refreshes_shared_days() {
    let mut app = build_test_app();
    app.add_plugins(CalendarPlugin);
    app.world_mut().resource_mut::<NpcRegistry>().insert(npc("marco", Season::Summer, 8, 1));
    app.world_mut().resource_mut::<NpcRegistry>().insert(npc("rosa", Season::Summer, 8, 16));
    add_birthday_systems(&mut app, CycleMode::Always, 120);
    {
        let world = app.world_mut();
        let npcs = world.resource::<NpcRegistry>().clone();
        world.resource_mut::<BirthdayRegistry>().recheck_events(&npcs);
    }

    app.world_mut().resource_mut::<Calendar>().day = DAYS_PER_SEASON;
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
    app.update();
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Playing);

    app.world_mut().resource_mut::<PlayerInput>().sleep = true;
    app.update();
    app.world_mut().resource_mut::<PlayerInput>().sleep = false;
    app.update();

    let calendar = app.world().resource::<Calendar>();
    assert_eq!((calendar.season, calendar.day), (Season::Summer, 1));
    let shared = app.world().resource::<SharedDaySet>();
    assert_eq!(shared.season, Season::Summer);
    assert_eq!(shared.days, vec![8]);
}

#[test]
fn test_data_plugin_populates_and_starts_playing() {
    let mut app = build_test_app();
    app.add_plugins(DataPlugin);
    app.update();
    app.update();

    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::Playing);
    assert!(!app.world().resource::<NpcRegistry>().npcs.is_empty());
    assert!(!app.world().resource::<CalendarEventTable>().days.is_empty());
}

#[test]
fn test_town_data_shares_spring_birthdays() {
    let mut app = build_test_app();
    app.add_plugins(DataPlugin);
    add_birthday_systems(&mut app, CycleMode::Always, 120);
    app.update();
    app.update();

    let _board = open_billboard(&mut app, Billboard::calendar(IVec2::ZERO));
    assert_eq!(app.world().resource::<SharedDaySet>().days, vec![3, 10]);
}
