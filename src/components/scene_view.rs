//! Canvas host: owns the draw loop, the simulation tick interval, and the
//! pointer listeners. All simulation mutation goes through the reducer; this
//! file only reads state and paints it.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::config::*;
use crate::model::{
    Bus, Car, CarLane, ContributorHandle, DragTarget, RecyclingSet, SceneAction, SceneState,
    SmokeKind, SmokeParticle, SolarPanel, Star, recycling_zone_rect, roof_target_rect,
};
use crate::state::{PointerState, scene_pos};
use crate::util::{lerp, lerp_color};

const TAU: f64 = PI * 2.0;

#[derive(Properties, PartialEq, Clone)]
pub struct SceneViewProps {
    pub scene: UseReducerHandle<SceneState>,
    pub contributor: ContributorHandle,
}

#[function_component(SceneView)]
pub fn scene_view(props: &SceneViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let scene_ref = use_mut_ref(|| props.scene.clone());
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let pointer = use_mut_ref(PointerState::default);

    // Keep the latest reducer handle available to the RAF loop.
    {
        let scene_ref = scene_ref.clone();
        let handle = props.scene.clone();
        use_effect(move || {
            *scene_ref.borrow_mut() = handle;
            || ()
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let scene = props.scene.clone();
        let scene_ref_setup = scene_ref.clone();
        let draw_ref_setup = draw_ref.clone();
        let pointer_setup = pointer.clone();
        let contributor = props.contributor.clone();

        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no global `window` exists");
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");
            canvas.set_width(SCENE_W as u32);
            canvas.set_height(SCENE_H as u32);

            // Build draw closure and store it for the RAF loop
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let scene_ref = scene_ref_setup.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas.get_context("2d").ok().flatten() {
                        Some(c) => match c.dyn_into::<CanvasRenderingContext2d>() {
                            Ok(c) => c,
                            Err(_) => return,
                        },
                        None => return,
                    };
                    let handle = scene_ref.borrow();
                    draw_scene(&ctx, &handle);
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());
            (draw_closure)();

            // Perpetual animation frame loop; drawing only, no state updates
            let raf_id = Rc::new(RefCell::new(None));
            let raf_closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
                Rc::new(RefCell::new(None));
            {
                let raf_id_clone = raf_id.clone();
                let draw_ref_loop = draw_ref_setup.clone();
                let window_loop = window.clone();
                let closure_cell_clone = raf_closure_cell.clone();
                *raf_closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    if let Some(f) = &*draw_ref_loop.borrow() {
                        f();
                    }
                    if let Ok(id) = window_loop.request_animation_frame(
                        closure_cell_clone
                            .borrow()
                            .as_ref()
                            .unwrap()
                            .as_ref()
                            .unchecked_ref(),
                    ) {
                        *raf_id_clone.borrow_mut() = Some(id);
                    }
                }) as Box<dyn FnMut()>));
                if let Ok(id) = window.request_animation_frame(
                    raf_closure_cell
                        .borrow()
                        .as_ref()
                        .unwrap()
                        .as_ref()
                        .unchecked_ref(),
                ) {
                    *raf_id.borrow_mut() = Some(id);
                }
            }

            // Simulation tick: the single driver of time-dependent state
            let sim_tick = {
                let scene = scene.clone();
                let contributor = contributor.clone();
                Closure::wrap(Box::new(move || {
                    if let Some(c) = &contributor.0 {
                        if let Some(amount) = c.poll_boost() {
                            scene.dispatch(SceneAction::ApplyBoost { amount });
                        }
                    }
                    scene.dispatch(SceneAction::Tick { now_ms: js_sys::Date::now() });
                }) as Box<dyn FnMut()>)
            };
            let sim_tick_id = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    sim_tick.as_ref().unchecked_ref(),
                    SIM_TICK_MS,
                )
                .unwrap();

            // Mouse down: start a drag when over a draggable
            let mousedown_cb = {
                let canvas = canvas.clone();
                let scene = scene.clone();
                let scene_ref = scene_ref_setup.clone();
                let pointer = pointer_setup.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    if e.button() != 0 {
                        return;
                    }
                    let (x, y) = scene_pos(&canvas, &e);
                    let grabbed = scene_ref.borrow().hit_test(x, y).is_some();
                    if grabbed {
                        pointer.borrow_mut().grabbing = true;
                        set_cursor(&canvas, "grabbing");
                    }
                    scene.dispatch(SceneAction::PointerDown { x, y });
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            // Mouse move: drag, or hover cursor feedback
            let mousemove_cb = {
                let canvas = canvas.clone();
                let scene = scene.clone();
                let scene_ref = scene_ref_setup.clone();
                let pointer = pointer_setup.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let (x, y) = scene_pos(&canvas, &e);
                    let (dragging, hover) = {
                        let handle = scene_ref.borrow();
                        (handle.dragging.is_some(), handle.hit_test(x, y).is_some())
                    };
                    if dragging {
                        scene.dispatch(SceneAction::PointerMove { x, y });
                        return;
                    }
                    let mut p = pointer.borrow_mut();
                    p.grabbing = false;
                    if hover != p.over_draggable {
                        p.over_draggable = hover;
                        set_cursor(&canvas, if hover { "grab" } else { "default" });
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            // Mouse up anywhere releases the drag
            let mouseup_cb = {
                let canvas = canvas.clone();
                let scene = scene.clone();
                let pointer = pointer_setup.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    pointer.borrow_mut().grabbing = false;
                    set_cursor(&canvas, "default");
                    scene.dispatch(SceneAction::PointerUp);
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("mouseup", mouseup_cb.as_ref().unchecked_ref())
                .unwrap();

            // Leaving the canvas drops the entity in place
            let mouseleave_cb = {
                let canvas = canvas.clone();
                let scene = scene.clone();
                let pointer = pointer_setup.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    pointer.borrow_mut().grabbing = false;
                    set_cursor(&canvas, "default");
                    scene.dispatch(SceneAction::PointerLeave);
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "mouseleave",
                    mouseleave_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            let window_clone = window.clone();
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "mousedown",
                    mousedown_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "mouseleave",
                    mouseleave_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                window_clone.clear_interval_with_handle(sim_tick_id);
                if let Some(id) = *raf_id.borrow() {
                    let _ = window_clone.cancel_animation_frame(id);
                }
                // keep closures alive until cleanup so the browser never
                // calls into freed memory
                let _keep_alive = (
                    &sim_tick,
                    &mousedown_cb,
                    &mousemove_cb,
                    &mouseup_cb,
                    &mouseleave_cb,
                    &raf_closure_cell,
                );
            }
        });
    }

    html! {
        <canvas
            ref={canvas_ref}
            id="scene-canvas"
            style="display:block; width:min(100vw, 1200px); aspect-ratio:2 / 1; background:#0b0e13; border-radius:8px;"
        ></canvas>
    }
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
    let _ = canvas.style().set_property("cursor", cursor);
}

fn set_line_dash2(ctx: &CanvasRenderingContext2d, a: f64, b: f64) {
    let arr = js_sys::Array::of2(&JsValue::from_f64(a), &JsValue::from_f64(b));
    ctx.set_line_dash(&arr).ok();
}

fn clear_line_dash(ctx: &CanvasRenderingContext2d) {
    ctx.set_line_dash(&js_sys::Array::new()).ok();
}

/// Rounded rect via corner arcs; web-sys has no stable roundRect yet.
fn fill_round_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    ctx.begin_path();
    ctx.arc(x + r, y + r, r, PI, PI * 1.5).ok();
    ctx.line_to(x + w - r, y);
    ctx.arc(x + w - r, y + r, r, PI * 1.5, 0.0).ok();
    ctx.line_to(x + w, y + h - r);
    ctx.arc(x + w - r, y + h - r, r, 0.0, PI * 0.5).ok();
    ctx.line_to(x + r, y + h);
    ctx.arc(x + r, y + h - r, r, PI * 0.5, PI).ok();
    ctx.close_path();
    ctx.fill();
}

// ---------------- scene painting ----------------

fn draw_scene(ctx: &CanvasRenderingContext2d, s: &SceneState) {
    ctx.clear_rect(0.0, 0.0, SCENE_W, SCENE_H);
    let night = s.day_night.night_factor;
    let pos = s.day_night.cycle_pos;
    // dashed-outline animation for the drop-zone highlights
    let dash_offset = (s.elapsed_ms / 16.0) % 100.0;
    let pulse = 0.5 + 0.5 * (s.elapsed_ms / 1000.0 * TAU).sin();

    draw_sky(ctx, night);
    draw_sun(ctx, pos, night);
    draw_moon(ctx, pos, night);
    draw_stars(ctx, &s.stars, night);
    draw_clouds(ctx, night);
    draw_factories(ctx);
    draw_ground(ctx);
    draw_road(ctx);
    draw_factory_gardens(ctx, s.growth);
    if s.show_transit {
        draw_bus(ctx, &s.bus);
    }
    draw_buildings(ctx, night);
    draw_trees_between_houses(ctx, s.growth);

    if s.show_panels {
        if let Some(DragTarget::Panel(i)) = s.dragging {
            if let Some(b) = BUILDINGS.get(s.panels[i].building_index) {
                draw_roof_highlight(ctx, b, pulse, dash_offset);
            }
        }
    }
    if s.show_recycling && s.dragging == Some(DragTarget::Recycling) {
        draw_recycling_zone_highlight(ctx, pulse, dash_offset);
    }

    if s.show_recycling {
        draw_recycling_set(ctx, &s.recycling);
    }
    if s.show_panels {
        for panel in &s.panels {
            draw_solar_panel(ctx, panel);
        }
    }
    draw_cars(ctx, &s.cars);
    draw_smoke(ctx, &s.smoke, s.mitigation.total);
}

// ----- sky -----

fn draw_sky(ctx: &CanvasRenderingContext2d, night: f64) {
    let grd = ctx.create_linear_gradient(0.0, 0.0, 0.0, GROUND_Y);
    let top = lerp_color("#78b7ff", "#1a1a2e", night);
    let middle = lerp_color("#c6e0ff", "#16213e", night);
    let bottom = lerp_color("#c6e0ff", "#0f1419", night);
    grd.add_color_stop(0.0, &top).ok();
    if night > 0.5 {
        grd.add_color_stop(0.5, &middle).ok();
    }
    grd.add_color_stop(1.0, &bottom).ok();
    ctx.set_fill_style_canvas_gradient(&grd);
    ctx.fill_rect(0.0, 0.0, SCENE_W, GROUND_Y);
}

/// Sun path over the four quarters; below the horizon during the night
/// quarter, where the alpha hides it anyway.
fn sun_geometry(pos: f64) -> (f64, f64, f64) {
    if pos <= 0.25 {
        let p = pos / 0.25;
        (lerp(200.0, 900.0, p), lerp(420.0, 120.0, p), 26.0 + (p * PI).sin() * 2.0)
    } else if pos <= 0.5 {
        let p = (pos - 0.25) / 0.25;
        (lerp(900.0, 1100.0, p), lerp(120.0, 420.0, p), 26.0 - (p * PI).sin() * 2.0)
    } else if pos <= 0.75 {
        let p = (pos - 0.5) / 0.25;
        (lerp(1100.0, 200.0, p), 470.0, 20.0)
    } else {
        let p = (pos - 0.75) / 0.25;
        (lerp(0.0, 200.0, p), lerp(420.0, 120.0, p), 26.0 + (p * PI).sin() * 2.0)
    }
}

fn draw_sun(ctx: &CanvasRenderingContext2d, pos: f64, night: f64) {
    let alpha = 1.0 - night;
    if alpha < 0.05 {
        return;
    }
    let (x, y, r) = sun_geometry(pos);
    // sunset and sunrise tint the disc orange
    let (c1, c2, c3) = if pos > 0.2 && pos < 0.3 {
        ("#ff6b35", "#ff8c42", "#ff6b35")
    } else if pos > 0.7 && pos < 0.8 {
        ("#ff8c42", "#ffb703", "#ff8f00")
    } else {
        ("#ffeb3b", "#ffb703", "#ff8f00")
    };

    ctx.save();
    ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
    ctx.set_shadow_color("rgba(255, 183, 3, 0.4)");
    ctx.set_shadow_blur(20.0);
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU).ok();
    ctx.close_path();
    if let Ok(grad) = ctx.create_radial_gradient(x - 8.0, y - 8.0, 0.0, x, y, r) {
        grad.add_color_stop(0.0, c1).ok();
        grad.add_color_stop(0.7, c2).ok();
        grad.add_color_stop(1.0, c3).ok();
        ctx.set_fill_style_canvas_gradient(&grad);
    } else {
        ctx.set_fill_style_str(c2);
    }
    ctx.fill();
    ctx.set_shadow_blur(0.0);

    ctx.begin_path();
    ctx.arc(x - 8.0, y - 8.0, r * 0.4, 0.0, TAU).ok();
    ctx.close_path();
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
    ctx.fill();
    ctx.restore();
}

fn moon_geometry(pos: f64) -> Option<(f64, f64)> {
    if pos < 0.2 {
        return None;
    }
    Some(if pos <= 0.5 {
        let p = (pos - 0.2) / 0.3;
        (lerp(1100.0, 850.0, p), lerp(420.0, 100.0, p))
    } else if pos <= 0.8 {
        let p = (pos - 0.5) / 0.3;
        (lerp(850.0, 200.0, p), lerp(100.0, 420.0, p))
    } else {
        let p = (pos - 0.8) / 0.2;
        (lerp(200.0, 0.0, p), 450.0)
    })
}

fn draw_moon(ctx: &CanvasRenderingContext2d, pos: f64, night: f64) {
    if night < 0.05 {
        return;
    }
    let Some((x, y)) = moon_geometry(pos) else {
        return;
    };
    let r = 24.0;

    ctx.save();
    ctx.set_global_alpha(night.clamp(0.0, 1.0));

    // halo
    if let Ok(halo) = ctx.create_radial_gradient(x, y, r, x, y, r + 15.0) {
        halo.add_color_stop(0.0, "rgba(255, 255, 255, 0.1)").ok();
        halo.add_color_stop(0.5, "rgba(255, 255, 255, 0.05)").ok();
        halo.add_color_stop(1.0, "rgba(255, 255, 255, 0)").ok();
        ctx.set_fill_style_canvas_gradient(&halo);
        ctx.begin_path();
        ctx.arc(x, y, r + 15.0, 0.0, TAU).ok();
        ctx.fill();
    }

    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU).ok();
    ctx.close_path();
    if let Ok(grad) = ctx.create_radial_gradient(x - 6.0, y - 6.0, 0.0, x, y, r) {
        grad.add_color_stop(0.0, "#f5f5dc").ok();
        grad.add_color_stop(0.5, "#e8e8d3").ok();
        grad.add_color_stop(1.0, "#c8c8b8").ok();
        ctx.set_fill_style_canvas_gradient(&grad);
    } else {
        ctx.set_fill_style_str("#e8e8d3");
    }
    ctx.fill();

    // craters
    ctx.set_fill_style_str("rgba(140, 140, 120, 0.5)");
    for (dx, dy, cr) in [
        (-8.0, -5.0, 4.0),
        (6.0, 4.0, 3.0),
        (-2.0, 8.0, 2.5),
        (4.0, -8.0, 2.0),
        (-5.0, 2.0, 2.0),
    ] {
        ctx.begin_path();
        ctx.arc(x + dx, y + dy, cr, 0.0, TAU).ok();
        ctx.fill();
    }

    ctx.begin_path();
    ctx.arc(x - 6.0, y - 6.0, r * 0.35, 0.0, TAU).ok();
    ctx.close_path();
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.5)");
    ctx.fill();
    ctx.restore();
}

fn draw_stars(ctx: &CanvasRenderingContext2d, stars: &[Star], night: f64) {
    if night < 0.05 {
        return;
    }
    ctx.save();
    ctx.set_fill_style_str("#ffffff");
    for star in stars {
        let alpha = (star.brightness * night).clamp(0.0, 1.0);
        ctx.set_global_alpha(alpha);
        ctx.begin_path();
        ctx.arc(star.x, star.y, star.size, 0.0, TAU).ok();
        ctx.fill();
        if star.size > 1.5 && alpha > 0.1 {
            ctx.set_global_alpha(alpha * 0.5);
            ctx.begin_path();
            ctx.arc(star.x, star.y, star.size * 1.5, 0.0, TAU).ok();
            ctx.fill();
        }
    }
    ctx.set_global_alpha(1.0);
    ctx.restore();
}

const CLOUDS: [(f64, f64, f64); 5] = [
    (140.0, 100.0, 1.0),
    (360.0, 120.0, 0.95),
    (560.0, 105.0, 1.05),
    (760.0, 130.0, 1.0),
    (980.0, 145.0, 0.9),
];

fn draw_clouds(ctx: &CanvasRenderingContext2d, night: f64) {
    let alpha = 1.0 - night;
    if alpha < 0.05 {
        return;
    }
    for (x, y, scale) in CLOUDS {
        ctx.save();
        ctx.translate(x, y).ok();
        ctx.scale(scale, scale).ok();
        ctx.set_global_alpha(alpha);
        ctx.set_shadow_color("rgba(255,255,255,0.6)");
        ctx.set_shadow_blur(12.0);
        ctx.set_fill_style_str("rgba(255,255,255,0.92)");
        ctx.begin_path();
        ctx.arc(0.0, 0.0, 20.0, 0.0, TAU).ok();
        ctx.arc(28.0, -2.0, 18.0, 0.0, TAU).ok();
        ctx.arc(52.0, 2.0, 22.0, 0.0, TAU).ok();
        ctx.arc(18.0, -14.0, 16.0, 0.0, TAU).ok();
        ctx.arc(40.0, -16.0, 15.0, 0.0, TAU).ok();
        ctx.close_path();
        ctx.fill();
        ctx.set_shadow_blur(0.0);
        ctx.set_fill_style_str("rgba(255,255,255,0.6)");
        ctx.begin_path();
        ctx.arc(20.0, -14.0, 10.0, 0.0, TAU).ok();
        ctx.arc(38.0, -16.0, 9.0, 0.0, TAU).ok();
        ctx.close_path();
        ctx.fill();
        ctx.set_global_alpha(1.0);
        ctx.restore();
    }
}

// ----- ground band -----

fn draw_ground(ctx: &CanvasRenderingContext2d) {
    ctx.set_fill_style_str("#7a8a99");
    ctx.fill_rect(0.0, GROUND_Y, SCENE_W, GROUND_BOTTOM_Y - GROUND_Y);
    // apron below the ground strip
    ctx.set_fill_style_str("#313a46");
    ctx.fill_rect(0.0, GROUND_BOTTOM_Y, SCENE_W, SCENE_H - GROUND_BOTTOM_Y);
}

fn draw_road(ctx: &CanvasRenderingContext2d) {
    ctx.set_fill_style_str("#444c5a");
    ctx.fill_rect(0.0, ROAD_TOP_Y, SCENE_W, ROAD_BOTTOM_Y - ROAD_TOP_Y);

    ctx.set_stroke_style_str("#cfd7e6");
    set_line_dash2(ctx, 18.0, 14.0);
    ctx.set_line_width(3.0);
    ctx.begin_path();
    ctx.move_to(0.0, ROAD_CENTER_Y);
    ctx.line_to(SCENE_W, ROAD_CENTER_Y);
    ctx.stroke();
    clear_line_dash(ctx);
}

// ----- buildings & factories -----

const BUILDING_COLORS: [&str; 3] = ["#445066", "#384356", "#2f3848"];

fn draw_buildings(ctx: &CanvasRenderingContext2d, night: f64) {
    for (bi, b) in BUILDINGS.iter().enumerate() {
        let top = GROUND_Y - b.h;
        let body = lerp_color(BUILDING_COLORS[bi % 3], "#1b2130", night * 0.6);
        ctx.set_fill_style_str(&body);
        ctx.fill_rect(b.x, top, b.w, b.h);

        let cols = (((b.w - 24.0) / 30.0).floor() as i32).max(1);
        let rows = (((b.h - 46.0) / 36.0).floor() as i32).max(1);
        for row in 0..rows {
            for col in 0..cols {
                let wx = b.x + 12.0 + col as f64 * 30.0;
                let wy = top + 12.0 + row as f64 * 36.0;
                // stable per-window pattern so the night lighting does not
                // flicker frame to frame
                let lit = (row * 7 + col * 13 + bi as i32 * 5) % 3 != 0;
                ctx.save();
                if night > 0.35 && lit {
                    ctx.set_global_alpha(night.clamp(0.0, 1.0));
                    ctx.set_fill_style_str("#ffd966");
                } else {
                    ctx.set_global_alpha((1.0 - night * 0.7).clamp(0.0, 1.0));
                    ctx.set_fill_style_str("#d7e8f5");
                }
                fill_round_rect(ctx, wx, wy, 16.0, 22.0, 2.0);
                ctx.restore();
            }
        }

        ctx.set_fill_style_str("#2a3342");
        fill_round_rect(ctx, b.x + b.w * 0.5 - 11.0, GROUND_Y - 34.0, 22.0, 34.0, 3.0);
    }
}

fn draw_factories(ctx: &CanvasRenderingContext2d) {
    let silhouette = "#6a7680";
    let darker = "#5f6c78";
    ctx.save();
    ctx.set_global_alpha(0.7);
    for (idx, f) in FACTORIES.iter().enumerate() {
        ctx.set_fill_style_str(if idx % 2 == 0 { silhouette } else { darker });
        ctx.fill_rect(f.x, FACTORY_BASE_Y - f.h, f.w, f.h);
        for c in f.chimneys {
            ctx.set_fill_style_str(darker);
            ctx.fill_rect(f.x + c.x_off, FACTORY_BASE_Y - f.h - c.h, c.w, c.h);
        }
        // base shadow line
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.12)");
        ctx.fill_rect(f.x, FACTORY_BASE_Y - 1.0, f.w, 5.0);
    }
    ctx.restore();
}

// ----- vegetation -----

const HOUSE_TREES: [(f64, f64); 4] = [(215.0, 1.0), (357.0, 0.9), (550.0, 1.05), (722.0, 0.95)];
const GARDEN_TREES: [(f64, f64); 2] = [(745.0, 0.8), (1068.0, 0.9)];
const GARDEN_FLOWERS: [(f64, &str); 9] = [
    (800.0, "#e5734a"),
    (824.0, "#d44d7a"),
    (848.0, "#8a5ad1"),
    (935.0, "#d44d7a"),
    (962.0, "#e5b84a"),
    (988.0, "#e5734a"),
    (1110.0, "#8a5ad1"),
    (1136.0, "#e5b84a"),
    (1162.0, "#d44d7a"),
];

fn draw_trees_between_houses(ctx: &CanvasRenderingContext2d, growth: f64) {
    for (x, jitter) in HOUSE_TREES {
        draw_tree(ctx, x, GROUND_Y, growth * jitter);
    }
}

fn draw_factory_gardens(ctx: &CanvasRenderingContext2d, growth: f64) {
    for (x, jitter) in GARDEN_TREES {
        draw_tree(ctx, x, GROUND_Y, growth * jitter);
    }
    for (x, color) in GARDEN_FLOWERS {
        draw_flower(ctx, x, GROUND_Y - 2.0, growth, color);
    }
}

fn draw_tree(ctx: &CanvasRenderingContext2d, x: f64, base_y: f64, scale: f64) {
    let trunk_h = 45.0 * scale;
    let trunk_w = 8.0 * scale;
    let crown_r = 28.0 * scale;
    let crown_y = base_y - trunk_h;

    ctx.save();

    // ground shadow
    ctx.set_global_alpha((0.15 * scale).clamp(0.0, 1.0));
    ctx.set_fill_style_str("#000000");
    ctx.begin_path();
    ctx.ellipse(x, base_y + 2.0, crown_r * 0.8, crown_r * 0.4, 0.0, 0.0, TAU)
        .ok();
    ctx.fill();
    ctx.set_global_alpha(1.0);

    let trunk = ctx.create_linear_gradient(x - trunk_w * 0.5, crown_y, x + trunk_w * 0.5, base_y);
    trunk.add_color_stop(0.0, "#6b5a4a").ok();
    trunk.add_color_stop(0.5, "#5a4a3a").ok();
    trunk.add_color_stop(1.0, "#4a3a2a").ok();
    ctx.set_fill_style_canvas_gradient(&trunk);
    ctx.fill_rect(x - trunk_w * 0.5, crown_y, trunk_w, trunk_h);

    // layered crown, back to front
    ctx.set_fill_style_str("#3a6b4a");
    ctx.begin_path();
    ctx.arc(x - crown_r * 0.2, crown_y - crown_r * 0.4, crown_r * 0.9, 0.0, TAU)
        .ok();
    ctx.fill();
    ctx.set_fill_style_str("#4a7c59");
    ctx.begin_path();
    ctx.arc(x, crown_y - crown_r * 0.2, crown_r, 0.0, TAU).ok();
    ctx.fill();
    ctx.set_fill_style_str("#5a8c69");
    ctx.begin_path();
    ctx.arc(x - crown_r * 0.35, crown_y - crown_r * 0.45, crown_r * 0.55, 0.0, TAU)
        .ok();
    ctx.fill();
    ctx.set_fill_style_str("#6a9c79");
    ctx.begin_path();
    ctx.arc(x + crown_r * 0.3, crown_y - crown_r * 0.35, crown_r * 0.5, 0.0, TAU)
        .ok();
    ctx.fill();

    ctx.restore();
}

fn draw_flower(ctx: &CanvasRenderingContext2d, x: f64, base_y: f64, scale: f64, petal: &str) {
    let stem_h = 14.0 * scale;
    let head_y = base_y - stem_h;
    ctx.save();
    ctx.set_stroke_style_str("#3f7a4f");
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.move_to(x, base_y);
    ctx.line_to(x, head_y);
    ctx.stroke();

    ctx.set_fill_style_str(petal);
    for k in 0..5 {
        let angle = k as f64 / 5.0 * TAU;
        ctx.begin_path();
        ctx.arc(
            x + angle.cos() * 3.5 * scale,
            head_y + angle.sin() * 3.5 * scale,
            2.6 * scale,
            0.0,
            TAU,
        )
        .ok();
        ctx.fill();
    }
    ctx.set_fill_style_str("#f5d742");
    ctx.begin_path();
    ctx.arc(x, head_y, 2.2 * scale, 0.0, TAU).ok();
    ctx.fill();
    ctx.restore();
}

// ----- drop-zone highlights -----

fn draw_roof_highlight(
    ctx: &CanvasRenderingContext2d,
    building: &BuildingSpec,
    pulse: f64,
    dash_offset: f64,
) {
    let zone = roof_target_rect(building);
    let grad = ctx.create_linear_gradient(zone.x, zone.y, zone.x, zone.y + zone.h);
    grad.add_color_stop(0.0, &format!("rgba(0, 200, 255, {})", 0.10 + 0.10 * pulse))
        .ok();
    grad.add_color_stop(1.0, &format!("rgba(0, 255, 170, {})", 0.18 + 0.12 * pulse))
        .ok();
    ctx.set_fill_style_canvas_gradient(&grad);
    ctx.fill_rect(zone.x, zone.y, zone.w, zone.h);

    ctx.save();
    ctx.set_stroke_style_str("rgba(0, 255, 200, 0.8)");
    ctx.set_line_width(2.0 + pulse);
    set_line_dash2(ctx, 10.0, 6.0);
    ctx.set_line_dash_offset(-dash_offset);
    ctx.begin_path();
    ctx.rect(zone.x + 1.0, zone.y + 1.0, zone.w - 2.0, zone.h - 2.0);
    ctx.stroke();
    ctx.restore();
}

fn draw_recycling_zone_highlight(ctx: &CanvasRenderingContext2d, pulse: f64, dash_offset: f64) {
    let zone = recycling_zone_rect();
    let grad = ctx.create_linear_gradient(zone.x, zone.y, zone.x, zone.y + zone.h);
    grad.add_color_stop(0.0, &format!("rgba(0, 200, 100, {})", 0.15 + 0.10 * pulse))
        .ok();
    grad.add_color_stop(1.0, &format!("rgba(0, 255, 150, {})", 0.25 + 0.15 * pulse))
        .ok();
    ctx.set_fill_style_canvas_gradient(&grad);
    ctx.fill_rect(zone.x, zone.y, zone.w, zone.h);

    ctx.save();
    ctx.set_stroke_style_str("rgba(0, 255, 150, 0.8)");
    ctx.set_line_width(2.0 + pulse);
    set_line_dash2(ctx, 10.0, 6.0);
    ctx.set_line_dash_offset(-dash_offset);
    ctx.begin_path();
    ctx.rect(zone.x + 1.0, zone.y + 1.0, zone.w - 2.0, zone.h - 2.0);
    ctx.stroke();
    ctx.restore();
}

// ----- draggables -----

fn draw_solar_panel(ctx: &CanvasRenderingContext2d, panel: &SolarPanel) {
    let (x, y, w, h) = (panel.x, panel.y, panel.width, panel.height);

    ctx.set_fill_style_str("#1a3a52");
    fill_round_rect(ctx, x, y, w, h, 5.0);
    ctx.set_stroke_style_str("#2d4a5f");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.rect(x, y, w, h);
    ctx.stroke();

    let rows = 4;
    let cols = ((w / 30.0).floor() as i32).max(1);
    let cell_w = (w - 20.0) / cols as f64;
    let cell_h = (h - 20.0) / rows as f64;
    for row in 0..rows {
        for col in 0..cols {
            let cx = x + 10.0 + col as f64 * cell_w;
            let cy = y + 10.0 + row as f64 * cell_h;
            let grad = ctx.create_linear_gradient(cx, cy, cx + cell_w, cy + cell_h);
            grad.add_color_stop(0.0, "#2c5282").ok();
            grad.add_color_stop(0.5, "#1e3a5f").ok();
            grad.add_color_stop(1.0, "#0f1e2f").ok();
            ctx.set_fill_style_canvas_gradient(&grad);
            fill_round_rect(ctx, cx, cy, cell_w - 1.0, cell_h - 1.0, 2.0);
        }
    }

    // mounting feet
    ctx.set_fill_style_str("#3a4a5a");
    ctx.fill_rect(x + w * 0.25 - 3.0, y + h, 8.0, 4.0);
    ctx.fill_rect(x + w * 0.75 - 3.0, y + h, 8.0, 4.0);

    if panel.is_placed_correctly {
        ctx.save();
        ctx.set_stroke_style_str("#00ff88");
        ctx.set_line_width(2.0);
        set_line_dash2(ctx, 4.0, 4.0);
        ctx.begin_path();
        ctx.rect(x - 2.0, y - 2.0, w + 4.0, h + 4.0);
        ctx.stroke();
        ctx.restore();
    }
}

struct BinPalette {
    base: &'static str,
    dark: &'static str,
    lid: &'static str,
}

const BIN_PALETTES: [BinPalette; 3] = [
    BinPalette { base: "#2d7a4d", dark: "#1a5a3a", lid: "#3a8c5d" },
    BinPalette { base: "#d4a017", dark: "#b48a07", lid: "#e4b427" },
    BinPalette { base: "#1e5a8a", dark: "#0e3a5a", lid: "#2d6a9a" },
];

fn draw_single_bin(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, pal: &BinPalette) {
    ctx.save();
    ctx.set_fill_style_str(pal.base);
    fill_round_rect(ctx, x, y, w, h, 5.0);
    ctx.set_stroke_style_str(pal.dark);
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.rect(x, y, w, h);
    ctx.stroke();

    // lid
    ctx.set_fill_style_str(pal.lid);
    ctx.fill_rect(x + 1.0, y, w - 2.0, 8.0);

    // recycling arrows, stylized as a white triangle loop
    ctx.set_stroke_style_str("#ffffff");
    ctx.set_line_width(2.0);
    let cx = x + w * 0.5;
    let cy = y + h * 0.55;
    ctx.begin_path();
    for k in 0..3 {
        let a0 = -PI * 0.5 + k as f64 / 3.0 * TAU;
        let a1 = a0 + TAU / 3.0 - 0.5;
        ctx.move_to(cx + a0.cos() * 6.0, cy + a0.sin() * 6.0);
        ctx.line_to(cx + a1.cos() * 6.0, cy + a1.sin() * 6.0);
    }
    ctx.stroke();
    ctx.restore();
}

fn draw_recycling_set(ctx: &CanvasRenderingContext2d, set: &RecyclingSet) {
    let step = BIN_W + BIN_SPACING;
    for (i, pal) in BIN_PALETTES.iter().enumerate() {
        draw_single_bin(ctx, set.x + i as f64 * step, set.y, BIN_W, set.height, pal);
    }
    if set.is_placed_correctly {
        ctx.save();
        ctx.set_stroke_style_str("#00ff88");
        ctx.set_line_width(2.0);
        set_line_dash2(ctx, 4.0, 4.0);
        ctx.begin_path();
        ctx.rect(set.x - 2.0, set.y - 2.0, set.width + 4.0, set.height + 4.0);
        ctx.stroke();
        ctx.restore();
    }
}

// ----- traffic -----

fn draw_bus(ctx: &CanvasRenderingContext2d, bus: &Bus) {
    ctx.save();
    ctx.translate(bus.x, bus.y).ok();
    ctx.set_fill_style_str("#f1c40f");
    fill_round_rect(ctx, -bus.w * 0.5, -bus.h * 0.5, bus.w, bus.h, 6.0);

    ctx.set_fill_style_str("#dff2ff");
    let win_y = -bus.h * 0.22;
    let win_h = bus.h * 0.44;
    for i in 0..5 {
        let t = (i as f64 + 0.5) / 5.0;
        let wx = -bus.w * 0.36 + t * bus.w * 0.72;
        fill_round_rect(ctx, wx - 10.0, win_y, 20.0, win_h, 3.0);
    }

    ctx.set_fill_style_str("#222222");
    ctx.begin_path();
    ctx.arc(-bus.w * 0.35, bus.h * 0.5, 7.0, 0.0, TAU).ok();
    ctx.arc(bus.w * 0.35, bus.h * 0.5, 7.0, 0.0, TAU).ok();
    ctx.fill();
    ctx.restore();
}

fn draw_cars(ctx: &CanvasRenderingContext2d, cars: &[Car]) {
    for c in cars {
        ctx.save();
        ctx.translate(c.x, c.y).ok();
        ctx.scale(c.dir, 1.0).ok();
        ctx.set_fill_style_str(match c.lane {
            CarLane::Top => "#e74c3c",
            CarLane::Bottom => "#3498db",
        });
        fill_round_rect(ctx, -c.w * 0.5, -c.h * 0.5, c.w, c.h, 4.0);
        ctx.set_fill_style_str("#cfe8ff");
        fill_round_rect(ctx, -c.w * 0.2, -c.h * 0.6, c.w * 0.35, c.h * 0.55, 3.0);
        ctx.set_fill_style_str("#222222");
        ctx.begin_path();
        ctx.arc(-c.w * 0.25, c.h * 0.5, 5.0, 0.0, TAU).ok();
        ctx.arc(c.w * 0.25, c.h * 0.5, 5.0, 0.0, TAU).ok();
        ctx.fill();
        ctx.restore();
    }
}

fn draw_smoke(ctx: &CanvasRenderingContext2d, smoke: &[SmokeParticle], total_mitigation: f64) {
    // render-only extra transparency as mitigation rises
    let alpha_mult = 1.0 - total_mitigation * 0.25;
    for p in smoke {
        ctx.save();
        ctx.set_global_alpha((p.alpha * alpha_mult).clamp(0.0, 1.0));
        ctx.set_fill_style_str(match p.kind {
            SmokeKind::Factory => "rgba(220, 225, 230, 1)",
            SmokeKind::Car => "rgba(200, 205, 210, 1)",
        });
        ctx.begin_path();
        ctx.arc(p.x, p.y, p.radius.max(0.0), 0.0, TAU).ok();
        ctx.fill();
        ctx.restore();
    }
}
