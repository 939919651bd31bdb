//! Core simulation state for the eco-city scene.
//!
//! Everything time-dependent or interaction-driven lives in [`SceneState`]
//! behind a single reducer. The view layer only draws the current state and
//! dispatches [`SceneAction`]s; it never mutates simulation data directly,
//! so exactly one writer advances the scene per rendered frame.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::Reducible;

use crate::config::*;
use crate::util::smoothstep;

// ---------------- Geometry -----------------

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}

/// Drop-acceptance policy shared by every placement zone: the entity counts
/// as placed when its center lies in the zone OR its bounding box overlaps
/// the zone. Forgiving on purpose; drop-success tests rely on this union.
pub fn zone_accepts(entity: &Rect, zone: &Rect) -> bool {
    let (cx, cy) = entity.center();
    zone.contains(cx, cy) || entity.overlaps(zone)
}

/// Rooftop strip above a building where a solar panel may be dropped.
pub fn roof_target_rect(building: &BuildingSpec) -> Rect {
    let roof_y = GROUND_Y - building.h;
    Rect {
        x: building.x + ROOF_ZONE_PADDING_X,
        y: roof_y - ROOF_ZONE_HEIGHT - ROOF_ZONE_GAP,
        w: building.w - ROOF_ZONE_PADDING_X * 2.0,
        h: ROOF_ZONE_HEIGHT,
    }
}

/// Recycling drop zone, centered in the gap between the second and third
/// building.
pub fn recycling_zone_rect() -> Rect {
    let second = &BUILDINGS[1];
    let third = &BUILDINGS[2];
    let gap_start = second.x + second.w;
    let gap_width = third.x - gap_start;
    Rect {
        x: gap_start + gap_width * 0.5 - RECYCLING_ZONE_W * 0.5,
        y: GROUND_Y - RECYCLING_ZONE_H,
        w: RECYCLING_ZONE_W,
        h: RECYCLING_ZONE_H,
    }
}

/// Full-width road band the bus must land in.
pub fn road_band_rect() -> Rect {
    Rect {
        x: 0.0,
        y: ROAD_TOP_Y,
        w: SCENE_W,
        h: ROAD_BOTTOM_Y - ROAD_TOP_Y,
    }
}

/// Centerlines of the two traffic lanes, top first.
pub fn lane_centers() -> [f64; 2] {
    let lane_h = (ROAD_BOTTOM_Y - ROAD_TOP_Y) * 0.5;
    [ROAD_TOP_Y + lane_h * 0.5, ROAD_TOP_Y + lane_h * 1.5]
}

/// Smoke outlets, one per factory chimney.
pub fn chimney_outlets() -> Vec<(f64, f64)> {
    let mut outlets = Vec::new();
    for f in &FACTORIES {
        for c in f.chimneys {
            outlets.push((
                f.x + c.x_off + c.w * 0.5,
                FACTORY_BASE_Y - f.h - c.h - CHIMNEY_OUTLET_RISE,
            ));
        }
    }
    outlets
}

// ---------------- Entities -----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokeKind {
    Factory,
    Car,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmokeParticle {
    pub kind: SmokeKind,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub growth: f64,
    pub alpha: f64,
    pub fade: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolarPanel {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Which building's roof this panel belongs to.
    pub building_index: usize,
    pub is_dragging: bool,
    pub drag_offset_x: f64,
    pub drag_offset_y: f64,
    pub is_placed_correctly: bool,
}

impl SolarPanel {
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

/// One cluster of three bins (green/yellow/blue) dragged as a unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecyclingSet {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub is_dragging: bool,
    pub drag_offset_x: f64,
    pub drag_offset_y: f64,
    pub is_placed_correctly: bool,
}

impl RecyclingSet {
    fn spawn() -> Self {
        Self {
            x: BIN_TRAY_X,
            y: BIN_TRAY_Y,
            width: BIN_W * 3.0 + BIN_SPACING * 2.0,
            height: BIN_H,
            is_dragging: false,
            drag_offset_x: 0.0,
            drag_offset_y: 0.0,
            is_placed_correctly: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.width, h: self.height }
    }
}

/// The bus position is its center, unlike the top-left anchored panels/bins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub is_dragging: bool,
    pub drag_offset_x: f64,
    pub drag_offset_y: f64,
    pub placed_on_road: bool,
    /// +1.0 drives right (top lane), -1.0 drives left (bottom lane).
    pub dir: f64,
    pub speed: f64,
    pub target_lane_y: f64,
    pub auto_drive: bool,
}

impl Bus {
    fn spawn() -> Self {
        Self {
            x: BUS_SPAWN_X,
            y: BUS_SPAWN_Y,
            w: BUS_W,
            h: BUS_H,
            is_dragging: false,
            drag_offset_x: 0.0,
            drag_offset_y: 0.0,
            placed_on_road: false,
            dir: 1.0,
            speed: BUS_SPEED,
            target_lane_y: BUS_SPAWN_Y,
            auto_drive: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x - self.w * 0.5,
            y: self.y - self.h * 0.5,
            w: self.w,
            h: self.h,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarLane {
    Top,
    Bottom,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub lane: CarLane,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub speed: f64,
    pub dir: f64,
    /// Elapsed-clock timestamp of the last exhaust puff.
    pub last_exhaust_ms: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub brightness: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    Panel(usize),
    Recycling,
    Bus,
}

// ---------------- Derived state -----------------

/// Per-source mitigation contributions plus their capped sum. Sources are
/// tracked separately and summed; no source overwrites another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MitigationState {
    pub from_panels: f64,
    pub from_recycling: f64,
    pub from_transit: f64,
    pub from_smile: f64,
    pub total: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DayNightState {
    /// Position within the cycle, always in `[0, 1)`.
    pub cycle_pos: f64,
    /// 0 = full day, 1 = full night.
    pub night_factor: f64,
}

impl DayNightState {
    pub fn is_night(&self) -> bool {
        self.cycle_pos > 0.25 && self.cycle_pos < 0.75
    }
}

/// Piecewise night factor over the cycle: a day quarter, a smoothstep
/// sunset, a night quarter, a smoothstep sunrise.
pub fn night_factor(cycle_pos: f64) -> f64 {
    let pos = cycle_pos.clamp(0.0, 0.999_999);
    if pos < 0.25 {
        0.0
    } else if pos < 0.5 {
        smoothstep((pos - 0.25) / 0.25)
    } else if pos < 0.75 {
        1.0
    } else {
        1.0 - smoothstep((pos - 0.75) / 0.25)
    }
}

/// Growth factor the interpolator chases. The epsilon keeps a just-under-cap
/// total from rounding below the full-growth target.
pub fn growth_target(total_mitigation: f64) -> f64 {
    ((total_mitigation + GROWTH_TARGET_EPSILON) / MITIGATION_CAP).clamp(GROWTH_FLOOR, 1.0)
}

/// Spawn probability for one chimney outlet in one tick. The floor keeps the
/// rate from ever reaching zero.
pub fn factory_spawn_probability(total_mitigation: f64, dt_ms: f64) -> f64 {
    let rate = FACTORY_SMOKE_RATE_PER_SEC * SMOKE_SPAWN_FLOOR.max(1.0 - total_mitigation);
    rate * dt_ms / 1000.0
}

/// Optional external contributor (e.g. a webcam smile detector). The core
/// never awaits it; the scene view polls it once per tick and forwards any
/// returned amount as a boost action.
pub trait MitigationContributor {
    fn poll_boost(&self) -> Option<f64>;
}

/// Prop-friendly wrapper: equality is contributor identity, not contents.
#[derive(Clone, Default)]
pub struct ContributorHandle(pub Option<Rc<dyn MitigationContributor>>);

impl PartialEq for ContributorHandle {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

// ---------------- Particle construction -----------------

fn factory_puff(outlet: (f64, f64), total: f64, rng: &mut SmallRng) -> SmokeParticle {
    let size_factor = SMOKE_SIZE_FLOOR.max(1.0 - total * 0.6);
    let growth_factor = SMOKE_GROWTH_FLOOR.max(1.0 - total * 0.5);
    SmokeParticle {
        kind: SmokeKind::Factory,
        x: outlet.0 + rng.gen_range(-2.0..2.0),
        y: outlet.1 + rng.gen_range(-1.0..1.0),
        vx: rng.gen_range(-0.075..0.075),
        vy: -(0.25 + rng.gen_range(0.0..1.0) * 0.35),
        radius: (6.0 + rng.gen_range(0.0..1.0) * 6.0) * size_factor,
        growth: (0.015 + rng.gen_range(0.0..1.0) * 0.02) * growth_factor,
        alpha: 0.35 * (1.0 - total * 0.6),
        fade: 0.04 * (1.0 + total * 0.5),
    }
}

fn car_puff(x: f64, y: f64, dir: f64, total: f64, rng: &mut SmallRng) -> SmokeParticle {
    let size_factor = SMOKE_SIZE_FLOOR.max(1.0 - total * 0.6);
    let growth_factor = SMOKE_GROWTH_FLOOR.max(1.0 - total * 0.5);
    let back = if dir > 0.0 { -0.12 } else { 0.12 };
    SmokeParticle {
        kind: SmokeKind::Car,
        x,
        y,
        vx: back + rng.gen_range(-0.06..0.06),
        vy: -(0.05 + rng.gen_range(0.0..1.0) * 0.1),
        radius: (2.5 + rng.gen_range(0.0..1.0) * 2.0) * size_factor,
        growth: (0.02 + rng.gen_range(0.0..1.0) * 0.02) * growth_factor,
        alpha: 0.5 * (1.0 - total * 0.6),
        fade: 0.10 * (1.0 + total * 0.5),
    }
}

fn generate_stars(rng: &mut SmallRng) -> Vec<Star> {
    (0..STAR_COUNT)
        .map(|_| Star {
            x: rng.gen_range(0.0..1.0) * SCENE_W,
            y: rng.gen_range(0.0..1.0) * GROUND_Y,
            size: 0.5 + rng.gen_range(0.0..1.0) * 2.0,
            brightness: 0.5 + rng.gen_range(0.0..1.0) * 0.5,
        })
        .collect()
}

fn spawn_panels() -> Vec<SolarPanel> {
    BUILDINGS
        .iter()
        .enumerate()
        .map(|(i, b)| SolarPanel {
            x: PANEL_TRAY_X + i as f64 * PANEL_TRAY_STEP,
            y: PANEL_TRAY_Y,
            width: b.w * PANEL_WIDTH_RATIO,
            height: PANEL_HEIGHT,
            building_index: i,
            is_dragging: false,
            drag_offset_x: 0.0,
            drag_offset_y: 0.0,
            is_placed_correctly: false,
        })
        .collect()
}

// ---------------- Scene state -----------------

#[derive(Clone, Debug)]
pub struct SceneState {
    // frame clock
    pub last_tick_ms: Option<f64>,
    pub elapsed_ms: f64,
    // layer visibility
    pub show_panels: bool,
    pub show_recycling: bool,
    pub show_transit: bool,
    // entities
    pub panels: Vec<SolarPanel>,
    pub recycling: RecyclingSet,
    pub bus: Bus,
    pub cars: Vec<Car>,
    pub smoke: Vec<SmokeParticle>,
    pub stars: Vec<Star>,
    pub dragging: Option<DragTarget>,
    // derived
    pub mitigation: MitigationState,
    pub growth: f64,
    pub day_night: DayNightState,
    pub smile_boost_ms: f64,
    pub next_car_spawn_ms: f64,
    rng: SmallRng,
}

// The RNG is excluded from equality: two states that differ only in RNG
// position render identically, and re-render triggers key off this.
impl PartialEq for SceneState {
    fn eq(&self, other: &Self) -> bool {
        self.last_tick_ms == other.last_tick_ms
            && self.elapsed_ms == other.elapsed_ms
            && self.show_panels == other.show_panels
            && self.show_recycling == other.show_recycling
            && self.show_transit == other.show_transit
            && self.panels == other.panels
            && self.recycling == other.recycling
            && self.bus == other.bus
            && self.cars == other.cars
            && self.smoke == other.smoke
            && self.stars == other.stars
            && self.dragging == other.dragging
            && self.mitigation == other.mitigation
            && self.growth == other.growth
            && self.day_night == other.day_night
            && self.smile_boost_ms == other.smile_boost_ms
            && self.next_car_spawn_ms == other.next_car_spawn_ms
    }
}

impl SceneState {
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let stars = generate_stars(&mut rng);
        let mut state = Self {
            last_tick_ms: None,
            elapsed_ms: 0.0,
            show_panels: false,
            show_recycling: false,
            show_transit: false,
            panels: spawn_panels(),
            recycling: RecyclingSet::spawn(),
            bus: Bus::spawn(),
            cars: Vec::new(),
            smoke: Vec::new(),
            stars,
            dragging: None,
            mitigation: MitigationState::default(),
            growth: GROWTH_FLOOR,
            day_night: DayNightState::default(),
            smile_boost_ms: 0.0,
            next_car_spawn_ms: 0.0,
            rng,
        };
        state.recompute_mitigation();
        state
    }

    pub fn placed_panel_count(&self) -> usize {
        self.panels.iter().filter(|p| p.is_placed_correctly).count()
    }

    /// Topmost draggable under the pointer, respecting layer visibility.
    /// Panels are drawn above bins, bins above the bus, so hit order follows.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<DragTarget> {
        if self.show_panels {
            for (i, p) in self.panels.iter().enumerate() {
                if p.rect().contains(x, y) {
                    return Some(DragTarget::Panel(i));
                }
            }
        }
        if self.show_recycling && self.recycling.rect().contains(x, y) {
            return Some(DragTarget::Recycling);
        }
        if self.show_transit && self.bus.rect().contains(x, y) {
            return Some(DragTarget::Bus);
        }
        None
    }

    // ----- mitigation -----

    /// Re-derives per-source contributions from placement flags and clamps
    /// the sum. Must run in the same call stack as any placement or boost
    /// mutation; a stale total is a defect.
    fn recompute_mitigation(&mut self) {
        let placed = self.placed_panel_count() as f64;
        let m = &mut self.mitigation;
        m.from_panels = placed * PANEL_MITIGATION;
        m.from_recycling = if self.recycling.is_placed_correctly {
            RECYCLING_MITIGATION
        } else {
            0.0
        };
        m.total = (m.from_panels + m.from_recycling + m.from_transit + m.from_smile)
            .clamp(0.0, MITIGATION_CAP);
    }

    fn refresh_panel_placements(&mut self) {
        let visible = self.show_panels;
        for p in &mut self.panels {
            p.is_placed_correctly = visible && panel_on_roof(p);
        }
    }

    fn refresh_recycling_placement(&mut self) {
        self.recycling.is_placed_correctly =
            self.show_recycling && zone_accepts(&self.recycling.rect(), &recycling_zone_rect());
    }

    fn set_transit_contribution(&mut self) {
        self.mitigation.from_transit = if self.show_transit && self.bus.placed_on_road {
            TRANSIT_MITIGATION
        } else {
            0.0
        };
    }

    // ----- per-tick updates -----

    /// Advances the frame clock and returns the clamped delta. NaN, negative
    /// and oversized deltas (tab resume) all collapse into `[0, MAX_FRAME_MS]`.
    fn clock_advance(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_tick_ms {
            Some(last) => {
                let raw = now_ms - last;
                if raw.is_finite() {
                    raw.clamp(0.0, MAX_FRAME_MS)
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        if now_ms.is_finite() {
            self.last_tick_ms = Some(now_ms);
        }
        self.elapsed_ms += dt;
        dt
    }

    fn update_day_night(&mut self) {
        let pos = (self.elapsed_ms % DAY_NIGHT_CYCLE_MS) / DAY_NIGHT_CYCLE_MS;
        // never let the position touch the wrap boundary itself
        let pos = pos.clamp(0.0, 0.999_999);
        self.day_night.cycle_pos = pos;
        self.day_night.night_factor = night_factor(pos);
    }

    fn update_smile_boost(&mut self, dt: f64) {
        if self.smile_boost_ms <= 0.0 {
            return;
        }
        self.smile_boost_ms -= dt;
        if self.smile_boost_ms <= 0.0 {
            self.smile_boost_ms = 0.0;
            self.mitigation.from_smile = 0.0;
            self.recompute_mitigation();
        }
    }

    fn spawn_factory_smoke(&mut self, dt: f64) {
        let total = self.mitigation.total;
        let prob = factory_spawn_probability(total, dt);
        for outlet in chimney_outlets() {
            if self.rng.gen_range(0.0..1.0) < prob {
                let puff = factory_puff(outlet, total, &mut self.rng);
                self.smoke.push(puff);
            }
        }
    }

    fn update_bus(&mut self, dt: f64) {
        if !self.show_transit {
            return;
        }
        let b = &mut self.bus;
        if b.is_dragging || !b.placed_on_road || !b.auto_drive {
            return;
        }
        b.x += b.speed * b.dir * dt;
        if b.dir > 0.0 && b.x - b.w * 0.5 > SCENE_W + BUS_WRAP_MARGIN {
            b.x = -BUS_WRAP_MARGIN;
        } else if b.dir < 0.0 && b.x + b.w * 0.5 < -BUS_WRAP_MARGIN {
            b.x = SCENE_W + BUS_WRAP_MARGIN;
        }
        b.y += (b.target_lane_y - b.y) * BUS_LANE_EASE * (dt / REF_FRAME_MS);
    }

    fn spawn_car(&mut self) {
        let now = self.elapsed_ms;
        let car = if self.rng.gen_range(0.0..1.0) < 0.5 {
            Car {
                lane: CarLane::Top,
                x: -120.0,
                y: CAR_LANE_TOP_Y,
                w: 46.0,
                h: 16.0,
                speed: 0.18 + self.rng.gen_range(0.0..1.0) * 0.10,
                dir: 1.0,
                last_exhaust_ms: now,
            }
        } else {
            Car {
                lane: CarLane::Bottom,
                x: SCENE_W + 120.0,
                y: CAR_LANE_BOTTOM_Y,
                w: 52.0,
                h: 18.0,
                speed: 0.16 + self.rng.gen_range(0.0..1.0) * 0.10,
                dir: -1.0,
                last_exhaust_ms: now,
            }
        };
        self.cars.push(car);
    }

    fn update_cars(&mut self, dt: f64) {
        if self.elapsed_ms >= self.next_car_spawn_ms {
            self.spawn_car();
            let base_gap = CAR_SPAWN_GAP_MIN_MS + self.rng.gen_range(0.0..1.0) * CAR_SPAWN_GAP_JITTER_MS;
            let mut factor = 1.0 + self.mitigation.total;
            if self.show_transit && self.bus.placed_on_road {
                factor *= 1.25;
            }
            // night thins traffic out
            factor *= 1.0 + self.day_night.night_factor * 2.0;
            self.next_car_spawn_ms = self.elapsed_ms + base_gap * factor;
        }

        let total = self.mitigation.total;
        let now = self.elapsed_ms;
        let exhaust_interval = CAR_EXHAUST_INTERVAL_MS * (1.0 + total * 3.0);
        let mut exhaust_at: Vec<(f64, f64, f64)> = Vec::new();
        self.cars.retain_mut(|c| {
            c.x += c.speed * c.dir * dt;
            let gone = (c.dir > 0.0 && c.x - c.w > SCENE_W + CAR_DESPAWN_MARGIN)
                || (c.dir < 0.0 && c.x + c.w < -CAR_DESPAWN_MARGIN);
            if gone {
                return false;
            }
            if now - c.last_exhaust_ms > exhaust_interval {
                let rear_x = if c.dir > 0.0 {
                    c.x - c.w * 0.5 - 4.0
                } else {
                    c.x + c.w * 0.5 + 4.0
                };
                exhaust_at.push((rear_x, c.y + c.h * 0.25, c.dir));
                c.last_exhaust_ms = now;
            }
            true
        });
        for (x, y, dir) in exhaust_at {
            let puff = car_puff(x, y, dir, total, &mut self.rng);
            self.smoke.push(puff);
        }
    }

    fn update_smoke(&mut self, dt: f64) {
        // particles already in flight dissolve a little faster as mitigation
        // rises
        let fade_mult = 1.0 + self.mitigation.total * 0.5;
        self.smoke.retain_mut(|p| {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.radius += p.growth * dt;
            p.alpha -= p.fade * (dt / 1000.0) * fade_mult;
            p.alpha > 0.0 && p.radius > 0.0 && p.y + p.radius >= 0.0
        });
    }

    fn update_growth(&mut self, dt: f64) {
        let target = growth_target(self.mitigation.total);
        // pre-clamped to one reference frame so a stalled tick cannot
        // overshoot the interpolation
        let frames = dt.min(REF_FRAME_MS) / REF_FRAME_MS;
        let diff = target - self.growth;
        if diff.abs() < GROWTH_SNAP_EPSILON {
            self.growth = target;
        } else {
            self.growth += diff * GROWTH_TRANSITION_SPEED * frames;
        }
        self.growth = self.growth.clamp(GROWTH_FLOOR, 1.0);
    }

    // ----- pointer handling -----

    fn pointer_down(&mut self, x: f64, y: f64) {
        let Some(target) = self.hit_test(x, y) else {
            return;
        };
        self.dragging = Some(target);
        match target {
            DragTarget::Panel(i) => {
                let p = &mut self.panels[i];
                p.is_dragging = true;
                p.drag_offset_x = x - p.x;
                p.drag_offset_y = y - p.y;
            }
            DragTarget::Recycling => {
                let r = &mut self.recycling;
                r.is_dragging = true;
                r.drag_offset_x = x - r.x;
                r.drag_offset_y = y - r.y;
            }
            DragTarget::Bus => {
                let b = &mut self.bus;
                b.is_dragging = true;
                b.drag_offset_x = x - b.x;
                b.drag_offset_y = y - b.y;
                // grabbing the bus suspends its contribution until release
                b.auto_drive = false;
                b.placed_on_road = false;
                self.set_transit_contribution();
                self.recompute_mitigation();
            }
        }
    }

    fn pointer_move(&mut self, x: f64, y: f64) {
        match self.dragging {
            Some(DragTarget::Panel(i)) => {
                let p = &mut self.panels[i];
                p.x = x - p.drag_offset_x;
                p.y = y - p.drag_offset_y;
                self.refresh_panel_placements();
                self.recompute_mitigation();
            }
            Some(DragTarget::Recycling) => {
                let r = &mut self.recycling;
                r.x = x - r.drag_offset_x;
                r.y = y - r.drag_offset_y;
                self.refresh_recycling_placement();
                self.recompute_mitigation();
            }
            Some(DragTarget::Bus) => {
                let b = &mut self.bus;
                b.x = x - b.drag_offset_x;
                b.y = y - b.drag_offset_y;
                let on_road = zone_accepts(&b.rect(), &road_band_rect());
                if on_road != b.placed_on_road {
                    b.placed_on_road = on_road;
                    self.set_transit_contribution();
                    self.recompute_mitigation();
                }
            }
            None => {}
        }
    }

    fn pointer_up(&mut self) {
        let Some(target) = self.dragging.take() else {
            return;
        };
        match target {
            DragTarget::Panel(_) => {
                for p in &mut self.panels {
                    p.is_dragging = false;
                }
                self.refresh_panel_placements();
                self.recompute_mitigation();
            }
            DragTarget::Recycling => {
                self.recycling.is_dragging = false;
                self.refresh_recycling_placement();
                self.recompute_mitigation();
            }
            DragTarget::Bus => {
                self.bus.is_dragging = false;
                let on_road = zone_accepts(&self.bus.rect(), &road_band_rect());
                self.bus.placed_on_road = on_road;
                if on_road {
                    self.align_bus_to_lane();
                    self.bus.auto_drive = true;
                } else {
                    self.bus.auto_drive = false;
                }
                self.set_transit_contribution();
                self.recompute_mitigation();
            }
        }
    }

    /// Snap to the nearest lane centerline; the top lane drives right, the
    /// bottom lane left.
    fn align_bus_to_lane(&mut self) {
        let centers = lane_centers();
        let mid_road = (ROAD_TOP_Y + ROAD_BOTTOM_Y) * 0.5;
        let top_lane = self.bus.y <= mid_road;
        let b = &mut self.bus;
        b.dir = if top_lane { 1.0 } else { -1.0 };
        b.target_lane_y = if top_lane { centers[0] } else { centers[1] };
        b.y = b.target_lane_y;
    }

    // ----- toggles / boost / reset -----

    fn set_panels_visible(&mut self, visible: bool) {
        self.show_panels = visible;
        if !visible {
            for p in &mut self.panels {
                p.is_dragging = false;
            }
            if matches!(self.dragging, Some(DragTarget::Panel(_))) {
                self.dragging = None;
            }
        }
        self.refresh_panel_placements();
        self.recompute_mitigation();
    }

    fn set_recycling_visible(&mut self, visible: bool) {
        self.show_recycling = visible;
        if !visible {
            self.recycling.is_dragging = false;
            if self.dragging == Some(DragTarget::Recycling) {
                self.dragging = None;
            }
        }
        self.refresh_recycling_placement();
        self.recompute_mitigation();
    }

    fn set_transit_visible(&mut self, visible: bool) {
        self.show_transit = visible;
        if self.dragging == Some(DragTarget::Bus) {
            self.dragging = None;
        }
        let b = &mut self.bus;
        b.is_dragging = false;
        b.auto_drive = false;
        if visible {
            // re-seat at the shown position, which already sits on the road
            b.x = BUS_SHOWN_X;
            b.y = BUS_SPAWN_Y;
            b.target_lane_y = b.y;
            b.placed_on_road = zone_accepts(&b.rect(), &road_band_rect());
        } else {
            b.placed_on_road = false;
        }
        self.set_transit_contribution();
        self.recompute_mitigation();
    }

    fn apply_boost(&mut self, amount: f64) {
        self.mitigation.from_smile = amount.max(0.0);
        self.smile_boost_ms = SMILE_BOOST_DURATION_MS;
        self.recompute_mitigation();
    }

    fn reset_all(&mut self) {
        self.last_tick_ms = None;
        self.elapsed_ms = 0.0;
        self.show_panels = false;
        self.show_recycling = false;
        self.show_transit = false;
        self.panels = spawn_panels();
        self.recycling = RecyclingSet::spawn();
        self.bus = Bus::spawn();
        self.cars.clear();
        self.smoke.clear();
        self.stars = generate_stars(&mut self.rng);
        self.dragging = None;
        self.mitigation = MitigationState::default();
        self.growth = GROWTH_FLOOR;
        self.day_night = DayNightState::default();
        self.smile_boost_ms = 0.0;
        self.next_car_spawn_ms = 0.0;
        self.recompute_mitigation();
    }
}

fn panel_on_roof(p: &SolarPanel) -> bool {
    // a panel with no associated building is simply never placed
    let Some(building) = BUILDINGS.get(p.building_index) else {
        return false;
    };
    zone_accepts(&p.rect(), &roof_target_rect(building))
}

// ---------------- Reducer & Actions -----------------

#[derive(Clone, Debug, PartialEq)]
pub enum SceneAction {
    /// One simulation step; `now_ms` is a monotonic timestamp.
    Tick { now_ms: f64 },
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Pointer left the canvas mid-drag; treated as a release in place.
    PointerLeave,
    SetPanelsVisible(bool),
    SetRecyclingVisible(bool),
    SetTransitVisible(bool),
    /// External contributor fired (e.g. smile detected); re-arms the decay
    /// timer each time.
    ApplyBoost { amount: f64 },
    ResetAll,
}

impl Reducible for SceneState {
    type Action = SceneAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use SceneAction::*;
        let mut new = (*self).clone();
        match action {
            Tick { now_ms } => {
                let dt = new.clock_advance(now_ms);
                new.update_day_night();
                if dt > 0.0 {
                    new.update_smile_boost(dt);
                    new.spawn_factory_smoke(dt);
                    new.update_bus(dt);
                    new.update_cars(dt);
                    new.update_smoke(dt);
                    new.update_growth(dt);
                }
            }
            PointerDown { x, y } => new.pointer_down(x, y),
            PointerMove { x, y } => new.pointer_move(x, y),
            PointerUp | PointerLeave => new.pointer_up(),
            SetPanelsVisible(v) => new.set_panels_visible(v),
            SetRecyclingVisible(v) => new.set_recycling_visible(v),
            SetTransitVisible(v) => new.set_transit_visible(v),
            ApplyBoost { amount } => new.apply_boost(amount),
            ResetAll => new.reset_all(),
        }
        Rc::new(new)
    }
}

// ---------------- Tests -----------------

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: u64 = 42;

    fn fresh() -> SceneState {
        SceneState::new(SEED)
    }

    fn dispatch(state: SceneState, action: SceneAction) -> SceneState {
        (*Rc::new(state).reduce(action)).clone()
    }

    /// Runs `n` ticks of `dt` milliseconds each through the reducer.
    fn run_ticks(mut state: SceneState, n: usize, dt: f64) -> SceneState {
        let mut now = state.last_tick_ms.unwrap_or(0.0);
        if state.last_tick_ms.is_none() {
            state = dispatch(state, SceneAction::Tick { now_ms: now });
        }
        for _ in 0..n {
            now += dt;
            state = dispatch(state, SceneAction::Tick { now_ms: now });
        }
        state
    }

    /// Drags whatever sits at `(from_x, from_y)` so its center lands on
    /// `(to_cx, to_cy)`.
    fn drag(state: SceneState, from_x: f64, from_y: f64, to_cx: f64, to_cy: f64) -> SceneState {
        let target = state.hit_test(from_x, from_y);
        assert!(target.is_some(), "nothing draggable at ({from_x}, {from_y})");
        let rect = match target.unwrap() {
            DragTarget::Panel(i) => state.panels[i].rect(),
            DragTarget::Recycling => state.recycling.rect(),
            DragTarget::Bus => state.bus.rect(),
        };
        let (cx, cy) = rect.center();
        let state = dispatch(state, SceneAction::PointerDown { x: from_x, y: from_y });
        // keep the grab point's offset from the entity center constant
        let state = dispatch(
            state,
            SceneAction::PointerMove {
                x: to_cx + (from_x - cx),
                y: to_cy + (from_y - cy),
            },
        );
        dispatch(state, SceneAction::PointerUp)
    }

    fn place_panel(state: SceneState, i: usize) -> SceneState {
        let p = state.panels[i].rect();
        let (zx, zy) = roof_target_rect(&BUILDINGS[i]).center();
        drag(state, p.x + 1.0, p.y + 1.0, zx, zy)
    }

    fn place_all(mut state: SceneState) -> SceneState {
        state = dispatch(state, SceneAction::SetPanelsVisible(true));
        for i in 0..BUILDINGS.len() {
            state = place_panel(state, i);
        }
        state = dispatch(state, SceneAction::SetRecyclingVisible(true));
        let r = state.recycling.rect();
        let (zx, zy) = recycling_zone_rect().center();
        state = drag(state, r.x + 1.0, r.y + 1.0, zx, zy);
        state
    }

    #[test]
    fn mitigation_total_never_exceeds_cap() {
        let mut state = place_all(fresh());
        assert!((state.mitigation.total - MITIGATION_CAP).abs() < 1e-9);

        // bus + smile on top of everything must stay clamped
        state = dispatch(state, SceneAction::SetTransitVisible(true));
        state = dispatch(state, SceneAction::ApplyBoost { amount: SMILE_BOOST_AMOUNT });
        assert!(state.mitigation.total <= MITIGATION_CAP + 1e-12);
        assert!(state.mitigation.total >= 0.0);
    }

    #[test]
    fn extra_sources_sum_instead_of_overwriting() {
        let mut state = dispatch(fresh(), SceneAction::SetTransitVisible(true));
        // the shown position already sits on the road
        assert!(state.bus.placed_on_road);
        assert!((state.mitigation.from_transit - TRANSIT_MITIGATION).abs() < 1e-12);

        state = dispatch(state, SceneAction::ApplyBoost { amount: SMILE_BOOST_AMOUNT });
        assert!((state.mitigation.from_smile - SMILE_BOOST_AMOUNT).abs() < 1e-12);
        let expected = (TRANSIT_MITIGATION + SMILE_BOOST_AMOUNT).min(MITIGATION_CAP);
        assert!((state.mitigation.total - expected).abs() < 1e-12);
    }

    #[test]
    fn panel_placement_is_monotonic() {
        let mut state = dispatch(fresh(), SceneAction::SetPanelsVisible(true));
        let mut last = state.mitigation.total;
        for i in 0..BUILDINGS.len() {
            state = place_panel(state, i);
            assert!(state.mitigation.total >= last);
            last = state.mitigation.total;
        }
        // dragging one panel back off the roof never raises the total
        let p = state.panels[0].rect();
        state = drag(state, p.x + 1.0, p.y + 1.0, 100.0, SCENE_H - 40.0);
        assert!(state.mitigation.total <= last);
        assert!(!state.panels[0].is_placed_correctly);
    }

    #[test]
    fn four_panels_scenario() {
        let mut state = dispatch(fresh(), SceneAction::SetPanelsVisible(true));
        for i in 0..4 {
            state = place_panel(state, i);
        }
        assert_eq!(state.placed_panel_count(), 4);
        assert!((state.mitigation.total - 0.4).abs() < 1e-9);
        // spawn probability that tick: base * max(floor, 0.6) * dt/1000
        let prob = factory_spawn_probability(state.mitigation.total, 16.67);
        let expected = FACTORY_SMOKE_RATE_PER_SEC * 0.6 * 16.67 / 1000.0;
        assert!((prob - expected).abs() < 1e-12);
    }

    #[test]
    fn spawn_probability_has_a_floor() {
        // even at the cap the spawn rate never reaches zero
        let at_cap = factory_spawn_probability(MITIGATION_CAP, 16.67);
        let clean = FACTORY_SMOKE_RATE_PER_SEC * SMOKE_SPAWN_FLOOR * 16.67 / 1000.0;
        assert!((at_cap - clean).abs() < 1e-12);
        assert!(at_cap > 0.0);
    }

    #[test]
    fn every_particle_retires() {
        let mut state = fresh();
        let outlets = chimney_outlets();
        for total in [0.0, 0.25, MITIGATION_CAP] {
            let puff = factory_puff(outlets[0], total, &mut state.rng);
            state.smoke.push(puff);
        }
        let mut ticks = 0;
        while !state.smoke.is_empty() {
            state.update_smoke(REF_FRAME_MS);
            ticks += 1;
            assert!(ticks < 5_000, "particles should retire in bounded time");
        }
    }

    #[test]
    fn smoke_reaches_steady_state_under_constant_mitigation() {
        // with spawn and retirement both active the population must settle
        // under a fixed bound instead of growing without limit
        let state = run_ticks(fresh(), 6_000, REF_FRAME_MS);
        assert!(
            state.smoke.len() < 2_000,
            "smoke population diverged: {}",
            state.smoke.len()
        );
    }

    #[test]
    fn night_factor_is_continuous_at_the_wrap() {
        let before = night_factor(0.999_999);
        let after = night_factor(0.0);
        assert!((before - after).abs() < 1e-4);

        // and everywhere else: no step larger than one smoothstep increment
        let steps = 10_000;
        let mut prev = night_factor(0.0);
        for i in 1..=steps {
            let pos = i as f64 / steps as f64 * 0.999_999;
            let nf = night_factor(pos);
            assert!((nf - prev).abs() < 0.002, "jump at pos {pos}");
            prev = nf;
        }
    }

    #[test]
    fn night_factor_quarters() {
        assert_eq!(night_factor(0.1), 0.0);
        assert_eq!(night_factor(0.6), 1.0);
        assert!((night_factor(0.375) - 0.5).abs() < 1e-9);
        assert!((night_factor(0.875) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn growth_converges_at_full_mitigation() {
        let mut state = place_all(fresh());
        assert!((state.mitigation.total - MITIGATION_CAP).abs() < 1e-9);
        state = run_ticks(state, 1_000, REF_FRAME_MS);
        assert!((state.growth - 1.0).abs() < 1e-3, "growth = {}", state.growth);
        // and stays settled, no oscillation
        let settled = state.growth;
        state = run_ticks(state, 200, REF_FRAME_MS);
        assert!((state.growth - settled).abs() < 1e-6);
    }

    #[test]
    fn growth_never_accelerates_past_a_stalled_tick() {
        let mut a = place_all(fresh());
        let mut b = a.clone();
        // a stalled 50 ms tick must not move growth further than one
        // reference frame would
        a.update_growth(MAX_FRAME_MS);
        b.update_growth(REF_FRAME_MS);
        assert!((a.growth - b.growth).abs() < 1e-12);
    }

    #[test]
    fn placement_predicate_is_idempotent() {
        let state = dispatch(fresh(), SceneAction::SetPanelsVisible(true));
        let p = state.panels[0].rect();
        let (zx, zy) = roof_target_rect(&BUILDINGS[0]).center();
        let state = dispatch(state, SceneAction::PointerDown { x: p.x + 1.0, y: p.y + 1.0 });
        let to_x = zx - state.panels[0].width * 0.5 + 1.0;
        let to_y = zy - state.panels[0].height * 0.5 + 1.0;
        let state = dispatch(state, SceneAction::PointerMove { x: to_x, y: to_y });
        let first = state.panels[0].is_placed_correctly;
        let state = dispatch(state, SceneAction::PointerMove { x: to_x, y: to_y });
        assert_eq!(state.panels[0].is_placed_correctly, first);
        assert!(first);
    }

    #[test]
    fn bus_dropped_on_road_snaps_and_drives() {
        let mut state = dispatch(fresh(), SceneAction::SetTransitVisible(true));
        // drag it off the road first so the drop does the work
        let (cx, cy) = state.bus.rect().center();
        state = drag(state, cx, cy, 600.0, 300.0);
        assert!(!state.bus.placed_on_road);
        assert!(!state.bus.auto_drive);
        assert_eq!(state.mitigation.from_transit, 0.0);

        // onto the upper half of the road band
        let (cx, cy) = state.bus.rect().center();
        state = drag(state, cx, cy, 600.0, ROAD_CENTER_Y - 1.0);
        assert!(state.bus.placed_on_road);
        assert!(state.bus.auto_drive);
        assert_eq!(state.bus.y, lane_centers()[0]);
        assert_eq!(state.bus.dir, 1.0);
        assert!((state.mitigation.from_transit - TRANSIT_MITIGATION).abs() < 1e-12);
        assert!((state.mitigation.total - TRANSIT_MITIGATION).abs() < 1e-12);

        // lower half picks the other lane and direction
        let (cx, cy) = state.bus.rect().center();
        state = drag(state, cx, cy, 600.0, ROAD_BOTTOM_Y - 2.0);
        assert_eq!(state.bus.y, lane_centers()[1]);
        assert_eq!(state.bus.dir, -1.0);
    }

    #[test]
    fn bus_auto_drive_moves_and_stays_in_bounds() {
        let mut state = dispatch(fresh(), SceneAction::SetTransitVisible(true));
        let (cx, cy) = state.bus.rect().center();
        state = drag(state, cx, cy, 600.0, ROAD_CENTER_Y - 1.0);
        assert!(state.bus.auto_drive);
        let start_x = state.bus.x;
        state = run_ticks(state, 200, REF_FRAME_MS);
        assert!(state.bus.x != start_x);
        // long enough to cross the right edge at least once; wraparound keeps
        // the bus inside the wrap margins
        state = run_ticks(state, 4_000, REF_FRAME_MS);
        assert!(state.bus.x - state.bus.w * 0.5 <= SCENE_W + BUS_WRAP_MARGIN + 1.0);
        assert!(state.bus.x >= -BUS_WRAP_MARGIN - state.bus.w);
    }

    #[test]
    fn hiding_a_layer_clears_its_contribution() {
        let mut state = place_all(fresh());
        assert!(state.mitigation.from_panels > 0.0);
        state = dispatch(state, SceneAction::SetPanelsVisible(false));
        assert_eq!(state.mitigation.from_panels, 0.0);
        assert!(state.panels.iter().all(|p| !p.is_placed_correctly));

        state = dispatch(state, SceneAction::SetRecyclingVisible(false));
        assert_eq!(state.mitigation.from_recycling, 0.0);
        assert_eq!(state.mitigation.total, 0.0);
    }

    #[test]
    fn reshowing_a_layer_recovers_placement_from_position() {
        let mut state = place_all(fresh());
        state = dispatch(state, SceneAction::SetPanelsVisible(false));
        assert_eq!(state.placed_panel_count(), 0);
        // panels kept their rooftop positions, so showing again re-places them
        state = dispatch(state, SceneAction::SetPanelsVisible(true));
        assert_eq!(state.placed_panel_count(), BUILDINGS.len());
        assert!((state.mitigation.from_panels - 0.4).abs() < 1e-9);
    }

    #[test]
    fn smile_boost_expires_after_its_duration() {
        let mut state = dispatch(fresh(), SceneAction::ApplyBoost { amount: SMILE_BOOST_AMOUNT });
        assert!((state.mitigation.total - SMILE_BOOST_AMOUNT).abs() < 1e-12);
        // 2.5 s of ticks comfortably outlives the 2 s boost
        state = run_ticks(state, 160, REF_FRAME_MS);
        assert_eq!(state.mitigation.from_smile, 0.0);
        assert_eq!(state.smile_boost_ms, 0.0);
        assert_eq!(state.mitigation.total, 0.0);
    }

    #[test]
    fn contributor_interface_feeds_the_boost_action() {
        struct FixedSmile;
        impl MitigationContributor for FixedSmile {
            fn poll_boost(&self) -> Option<f64> {
                Some(SMILE_BOOST_AMOUNT)
            }
        }
        let contributor: Option<Rc<dyn MitigationContributor>> = Some(Rc::new(FixedSmile));
        let mut state = fresh();
        if let Some(c) = &contributor {
            if let Some(amount) = c.poll_boost() {
                state = dispatch(state, SceneAction::ApplyBoost { amount });
            }
        }
        assert!((state.mitigation.from_smile - SMILE_BOOST_AMOUNT).abs() < 1e-12);
        assert!(state.smile_boost_ms > 0.0);
    }

    #[test]
    fn missing_contributor_is_zero_contribution() {
        let contributor: Option<Rc<dyn MitigationContributor>> = None;
        let mut state = fresh();
        if let Some(c) = &contributor {
            if let Some(amount) = c.poll_boost() {
                state = dispatch(state, SceneAction::ApplyBoost { amount });
            }
        }
        assert_eq!(state.mitigation.from_smile, 0.0);
        assert_eq!(state.mitigation.total, 0.0);
    }

    #[test]
    fn delta_time_is_clamped_and_sanitized() {
        let mut state = dispatch(fresh(), SceneAction::Tick { now_ms: 0.0 });
        // a 10-minute stall advances the clock by at most one clamped frame
        state = dispatch(state, SceneAction::Tick { now_ms: 600_000.0 });
        assert!(state.elapsed_ms <= MAX_FRAME_MS);

        // backwards and NaN timestamps contribute nothing
        let elapsed = state.elapsed_ms;
        state = dispatch(state, SceneAction::Tick { now_ms: 1_000.0 });
        assert_eq!(state.elapsed_ms, elapsed);
        state = dispatch(state, SceneAction::Tick { now_ms: f64::NAN });
        assert_eq!(state.elapsed_ms, elapsed);
        assert!(state.elapsed_ms.is_finite());
        state = dispatch(state, SceneAction::Tick { now_ms: 1_016.0 });
        assert!(state.elapsed_ms.is_finite());
    }

    #[test]
    fn reset_all_restores_the_initial_scene() {
        let mut state = place_all(fresh());
        state = dispatch(state, SceneAction::SetTransitVisible(true));
        state = dispatch(state, SceneAction::ApplyBoost { amount: SMILE_BOOST_AMOUNT });
        state = run_ticks(state, 600, REF_FRAME_MS);
        assert!(!state.smoke.is_empty());
        assert!(state.mitigation.total > 0.0);

        state = dispatch(state, SceneAction::ResetAll);
        assert!(state.smoke.is_empty());
        assert!(state.cars.is_empty());
        assert_eq!(state.mitigation.total, 0.0);
        assert_eq!(state.growth, GROWTH_FLOOR);
        assert_eq!(state.elapsed_ms, 0.0);
        assert_eq!(state.last_tick_ms, None);
        assert!(!state.show_panels && !state.show_recycling && !state.show_transit);
        assert!(state.panels.iter().all(|p| !p.is_placed_correctly));
        assert!(!state.recycling.is_placed_correctly);
        assert!(!state.bus.placed_on_road);
        assert_eq!(state.stars.len(), STAR_COUNT);

        // idempotent: a second reset changes nothing but star decoration
        let again = dispatch(state.clone(), SceneAction::ResetAll);
        assert_eq!(again.mitigation, state.mitigation);
        assert_eq!(again.growth, state.growth);
        assert_eq!(again.panels, state.panels);
        assert_eq!(again.bus, state.bus);
    }

    #[test]
    fn hit_test_respects_layer_visibility() {
        let state = fresh();
        let (cx, cy) = state.panels[0].rect().center();
        assert_eq!(state.hit_test(cx, cy), None);
        let state = dispatch(state, SceneAction::SetPanelsVisible(true));
        assert_eq!(state.hit_test(cx, cy), Some(DragTarget::Panel(0)));
    }

    #[test]
    fn drag_events_without_an_active_draggable_are_ignored() {
        let state = fresh();
        let moved = dispatch(state.clone(), SceneAction::PointerMove { x: 10.0, y: 10.0 });
        assert_eq!(moved, state);
        let released = dispatch(state.clone(), SceneAction::PointerUp);
        assert_eq!(released, state);
    }

    #[test]
    fn cars_spawn_and_emit_exhaust() {
        // about a minute of simulated traffic: the population stays bounded
        // by the spawn-gap / crossing-time equilibrium
        let state = run_ticks(fresh(), 4_000, REF_FRAME_MS);
        assert!(state.next_car_spawn_ms > 0.0);
        assert!(state.cars.len() < 200);
        assert!(state.smoke.iter().any(|p| p.kind == SmokeKind::Car));
    }
}
