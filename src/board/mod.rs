//! Browser shell around the puzzle engine.
//!
//! Owns the canvas, translates mouse/touch positions into board cells, feeds
//! them to the engine and repaints every animation frame. Reacts to engine
//! results: a completed connection bursts particles, a solved board shows the
//! win overlay, plays the win sound and advances to the next level after a
//! short delay.
//!
//! Expected page elements (all optional except the canvas, which is created if
//! missing): `#game-canvas`, `#game-container`, `#game-area`, `#level-display`,
//! `#ui-overlay`, `#reset-btn`, `#mission-brief`, `#controls` and a `<header>`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, EventTarget, HtmlAudioElement,
    HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent, window,
};

use crate::config::GameConfig;
use crate::engine::Move;
use crate::error::LevelError;
use crate::game::Game;
use crate::grid::Cell;

mod particles;
use particles::Particles;

/// Runtime board state.
struct BoardState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    game: Game,
    config: GameConfig,
    cell_px: f64,
    particles: Particles,
    win_audio: Option<HtmlAudioElement>,
    // First press plays the sound muted to satisfy autoplay policies.
    audio_unlocked: bool,
    audio_priming: bool,
    // Win overlay is up while an advance is pending; input waits for it.
    advance: AdvanceGate,
}

/// Pending post-win level advance. Every level change bumps the generation,
/// so a timer armed for an earlier level fires into nothing.
#[derive(Debug, Default)]
struct AdvanceGate {
    generation: u64,
    pending: bool,
}

impl AdvanceGate {
    fn arm(&mut self) -> u64 {
        self.pending = true;
        self.generation
    }

    fn is_pending(&self) -> bool {
        self.pending
    }

    /// Level changed by other means; drop any pending advance.
    fn cancel(&mut self) {
        self.pending = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Claim the advance for `ticket`. False if it was cancelled or superseded.
    fn take(&mut self, ticket: u64) -> bool {
        if !self.pending || ticket != self.generation {
            return false;
        }
        self.cancel();
        true
    }
}

thread_local! {
    static BOARD_STATE: RefCell<Option<BoardState>> = const { RefCell::new(None) };
}

fn with_state<R>(f: impl FnOnce(&mut BoardState) -> R) -> Option<R> {
    BOARD_STATE.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn level_err(err: LevelError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn document() -> Result<Document, JsValue> {
    window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(feature = "rng")]
fn particle_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(err) => {
            log::warn!("getrandom failed, seeding from clock: {err}");
            now_ms().to_bits()
        }
    }
}

#[cfg(not(feature = "rng"))]
fn particle_seed() -> u64 {
    now_ms().to_bits()
}

pub fn start_board(game: Game, config: GameConfig) -> Result<(), JsValue> {
    let doc = document()?;

    // Create / reuse the game canvas.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("game-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("game-canvas");
        c.set_attribute("style", "display:block; margin:0 auto; touch-action:none; background:#111;")?;
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let win_audio = match config.win_audio_src.as_deref() {
        Some(src) => {
            let audio = HtmlAudioElement::new_with_src(src)?;
            audio.set_preload("auto");
            Some(audio)
        }
        None => None,
    };

    let mut board = BoardState {
        canvas: canvas.clone(),
        ctx,
        game,
        config,
        cell_px: 0.0,
        particles: Particles::with_seed(particle_seed()),
        win_audio,
        audio_unlocked: false,
        audio_priming: false,
        advance: AdvanceGate::default(),
    };
    size_canvas(&mut board)?;
    sync_level_display(&board);
    BOARD_STATE.with(|b| b.replace(Some(board)));

    let canvas_target: &EventTarget = canvas.as_ref();
    let win_target: EventTarget = window().ok_or_else(|| JsValue::from_str("no window"))?.into();

    listen(canvas_target, "mousedown", None, |evt: MouseEvent| {
        on_press(evt.client_x(), evt.client_y());
    })?;
    listen(canvas_target, "mousemove", None, |evt: MouseEvent| {
        on_move(evt.client_x(), evt.client_y());
    })?;
    listen(&win_target, "mouseup", None, |_evt: MouseEvent| on_release())?;

    listen(canvas_target, "touchstart", Some(false), |evt: TouchEvent| {
        // Keep the page from scrolling while drawing.
        evt.prevent_default();
        if let Some(t) = evt.touches().get(0) {
            on_press(t.client_x(), t.client_y());
        }
    })?;
    listen(canvas_target, "touchmove", Some(false), |evt: TouchEvent| {
        evt.prevent_default();
        if let Some(t) = evt.touches().get(0) {
            on_move(t.client_x(), t.client_y());
        }
    })?;
    listen(&win_target, "touchend", None, |_evt: TouchEvent| on_release())?;
    listen(&win_target, "touchcancel", None, |_evt: TouchEvent| on_release())?;

    listen(&win_target, "resize", None, |_evt: web_sys::Event| {
        with_state(|st| {
            if let Err(err) = size_canvas(st) {
                log::warn!("resize failed: {err:?}");
            }
        });
    })?;

    if let Some(btn) = doc.get_element_by_id("reset-btn") {
        listen(btn.as_ref(), "click", None, |_evt: MouseEvent| {
            if let Err(err) = reset_level() {
                log::warn!("reset failed: {err:?}");
            }
        })?;
    }

    start_board_loop();
    Ok(())
}

fn listen<E>(
    target: &EventTarget,
    kind: &str,
    passive: Option<bool>,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    match passive {
        Some(passive) => {
            let opts = AddEventListenerOptions::new();
            opts.set_passive(passive);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &opts,
            )?;
        }
        None => {
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        }
    }
    closure.forget();
    Ok(())
}

fn cell_at(st: &BoardState, client_x: i32, client_y: i32) -> Cell {
    let rect = st.canvas.get_bounding_client_rect();
    let x = client_x as f64 - rect.left();
    let y = client_y as f64 - rect.top();
    if st.cell_px <= 0.0 {
        return Cell::new(-1, -1);
    }
    Cell::new((y / st.cell_px).floor() as i32, (x / st.cell_px).floor() as i32)
}

fn on_press(client_x: i32, client_y: i32) {
    with_state(|st| {
        unlock_audio(st);
        if st.advance.is_pending() {
            return;
        }
        let cell = cell_at(st, client_x, client_y);
        st.game.begin_drag(cell);
    });
}

fn on_move(client_x: i32, client_y: i32) {
    with_state(|st| {
        if st.advance.is_pending() {
            return;
        }
        let cell = cell_at(st, client_x, client_y);
        if let Move::Completed(conn) = st.game.extend_to(cell) {
            let cx = (conn.cell.col as f64 + 0.5) * st.cell_px;
            let cy = (conn.cell.row as f64 + 0.5) * st.cell_px;
            let color = st.config.color_css(conn.color).to_string();
            st.particles.spawn(
                cx,
                cy,
                &color,
                st.config.particle_count,
                st.config.particle_speed,
            );
            if conn.solved {
                if let Err(err) = celebrate(st) {
                    log::warn!("win sequence failed: {err:?}");
                }
            }
        }
    });
}

fn on_release() {
    with_state(|st| {
        st.game.end_drag();
        if st.audio_priming {
            st.audio_priming = false;
            if let Some(audio) = &st.win_audio {
                audio.pause().ok();
                audio.set_current_time(0.0);
                audio.set_muted(false);
            }
        }
    });
}

fn unlock_audio(st: &mut BoardState) {
    if st.audio_unlocked {
        return;
    }
    st.audio_unlocked = true;
    if let Some(audio) = &st.win_audio {
        audio.set_muted(true);
        match audio.play() {
            Ok(_) => st.audio_priming = true,
            Err(err) => log::warn!("audio unlock failed: {err:?}"),
        }
    }
}

fn celebrate(st: &mut BoardState) -> Result<(), JsValue> {
    let ticket = st.advance.arm();
    let doc = document()?;
    if let Some(overlay) = doc.get_element_by_id("ui-overlay") {
        overlay.class_list().add_1("visible")?;
    }
    if let Some(area) = doc.get_element_by_id("game-area") {
        area.class_list().add_1("flash-border")?;
    }
    if let Some(audio) = &st.win_audio {
        audio.set_muted(false);
        audio.set_current_time(0.0);
        audio.set_volume(1.0);
        if let Err(err) = audio.play() {
            log::warn!("win audio failed: {err:?}");
        }
    }

    let next = Closure::once_into_js(move || {
        with_state(|st| {
            if let Err(err) = finish_celebration(st, ticket) {
                log::warn!("level advance failed: {err:?}");
            }
        });
    });
    window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            next.unchecked_ref(),
            st.config.advance_delay_ms,
        )?;
    Ok(())
}

fn finish_celebration(st: &mut BoardState, ticket: u64) -> Result<(), JsValue> {
    if !st.advance.take(ticket) {
        return Ok(());
    }
    st.game.advance().map_err(level_err)?;
    after_level_load(st)?;
    hide_win_overlay()
}

fn hide_win_overlay() -> Result<(), JsValue> {
    let doc = document()?;
    if let Some(overlay) = doc.get_element_by_id("ui-overlay") {
        overlay.class_list().remove_1("visible")?;
    }
    if let Some(area) = doc.get_element_by_id("game-area") {
        area.class_list().remove_1("flash-border")?;
    }
    Ok(())
}

fn after_level_load(st: &mut BoardState) -> Result<(), JsValue> {
    st.particles.clear();
    sync_level_display(st);
    size_canvas(st)
}

fn sync_level_display(st: &BoardState) {
    if let Ok(doc) = document() {
        if let Some(el) = doc.get_element_by_id("level-display") {
            let shown = (st.game.current_index() + 1).to_string();
            el.set_text_content(Some(&shown));
        }
    }
}

fn element_height(el: Option<web_sys::Element>) -> f64 {
    el.and_then(|e| e.dyn_into::<HtmlElement>().ok())
        .map(|e| e.offset_height() as f64)
        .unwrap_or(0.0)
}

/// Fit a square board into the container width and the free window height.
fn size_canvas(st: &mut BoardState) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = document()?;
    let inner_w = win.inner_width()?.as_f64().unwrap_or(0.0);
    let inner_h = win.inner_height()?.as_f64().unwrap_or(0.0);

    let max_width = doc
        .get_element_by_id("game-container")
        .map(|c| c.get_bounding_client_rect().width())
        .unwrap_or(inner_w);
    let used_height = element_height(doc.query_selector("header")?)
        + element_height(doc.get_element_by_id("mission-brief"))
        + element_height(doc.get_element_by_id("controls"))
        + st.config.layout_margin_px;
    let max_height = inner_h - used_height;
    let size = max_width.min(max_height).max(st.config.min_board_px).floor();

    st.canvas.set_width(size as u32);
    st.canvas.set_height(size as u32);
    if let Some(area) = doc.get_element_by_id("game-area") {
        if let Ok(area) = area.dyn_into::<HtmlElement>() {
            let px = format!("{size}px");
            area.style().set_property("width", &px)?;
            area.style().set_property("height", &px)?;
        }
    }
    st.cell_px = size / st.game.engine().grid().size() as f64;
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_board_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_state(|st| board_tick(st, ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn board_tick(st: &mut BoardState, now: f64) {
    st.particles.update(st.config.particle_decay);
    if let Err(err) = render_board(st, now) {
        log::warn!("render failed: {err:?}");
    }
}

fn center(cell: Cell, cell_px: f64) -> (f64, f64) {
    (
        (cell.col as f64 + 0.5) * cell_px,
        (cell.row as f64 + 0.5) * cell_px,
    )
}

fn render_board(st: &BoardState, now: f64) -> Result<(), JsValue> {
    let ctx = &st.ctx;
    let w = st.canvas.width() as f64;
    let h = st.canvas.height() as f64;
    let cell = st.cell_px;
    let engine = st.game.engine();
    let n = engine.grid().size();

    ctx.set_fill_style_str("#111111");
    ctx.fill_rect(0.0, 0.0, w, h);

    // Grid lines
    ctx.set_stroke_style_str("#333333");
    ctx.set_line_width(2.0);
    for i in 0..=n {
        let pos = i as f64 * cell;
        line(ctx, pos, 0.0, pos, h);
        line(ctx, 0.0, pos, w, pos);
    }

    // Paths, glowing
    ctx.set_line_width(cell * 0.4);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_shadow_blur(15.0);
    for (color, path) in engine.paths().iter() {
        if path.len() < 2 {
            continue;
        }
        let css = st.config.color_css(color);
        ctx.set_stroke_style_str(css);
        ctx.set_shadow_color(css);
        ctx.begin_path();
        let (x0, y0) = center(path.anchor(), cell);
        ctx.move_to(x0, y0);
        for &c in &path.cells()[1..] {
            let (x, y) = center(c, cell);
            ctx.line_to(x, y);
        }
        ctx.stroke();
    }

    // Endpoint dots, pulsing
    let radius = cell * 0.25 + (now / 1000.0 * 3.0).sin() * cell * 0.02;
    for (c, color) in engine.grid().endpoints() {
        let css = st.config.color_css(color);
        let (x, y) = center(c, cell);
        ctx.set_fill_style_str(css);
        ctx.set_shadow_color(css);
        ctx.begin_path();
        ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU)?;
        ctx.fill();
    }
    ctx.set_shadow_blur(0.0);

    st.particles.draw(ctx, cell * 0.1);
    Ok(())
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}

/// Reload the current level from scratch.
#[wasm_bindgen]
pub fn reset_level() -> Result<(), JsValue> {
    with_state(|st| -> Result<(), JsValue> {
        st.game.reload().map_err(level_err)?;
        st.advance.cancel();
        hide_win_overlay()?;
        after_level_load(st)
    })
    .unwrap_or(Ok(()))
}

/// Current grid and paths as JSON, for external renderers and debugging.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn snapshot_json() -> Result<String, JsValue> {
    with_state(|st| serde_json::to_string(&st.game.engine().snapshot()))
        .ok_or_else(|| JsValue::from_str("game not started"))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Replace presentation settings on a running board.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn set_config_json(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_state(|st| -> Result<(), JsValue> {
        st.config = config;
        size_canvas(st)
    })
    .unwrap_or(Ok(()))
}

/// Swap in a level pack (JSON array of `{name, size, grid}`) and start at its first level.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn load_levels_json(json: &str) -> Result<(), JsValue> {
    let levels = crate::levels::LevelSpec::list_from_json(json).map_err(level_err)?;
    let game = Game::new(levels).map_err(level_err)?;
    with_state(move |st| -> Result<(), JsValue> {
        st.game = game;
        st.advance.cancel();
        hide_win_overlay()?;
        after_level_load(st)
    })
    .unwrap_or(Ok(()))
}

#[cfg(test)]
mod tests {
    use super::AdvanceGate;

    #[test]
    fn armed_advance_fires_once() {
        let mut gate = AdvanceGate::default();
        let ticket = gate.arm();
        assert!(gate.is_pending());
        assert!(gate.take(ticket));
        assert!(!gate.is_pending());
        assert!(!gate.take(ticket));
    }

    #[test]
    fn reload_during_win_delay_voids_the_advance() {
        let mut gate = AdvanceGate::default();
        let ticket = gate.arm();
        gate.cancel();
        assert!(!gate.is_pending());
        assert!(!gate.take(ticket));
    }

    #[test]
    fn stale_timer_does_not_claim_a_later_win() {
        let mut gate = AdvanceGate::default();
        let stale = gate.arm();
        gate.cancel();
        let fresh = gate.arm();
        assert!(!gate.take(stale));
        assert!(gate.is_pending());
        assert!(gate.take(fresh));
    }
}
