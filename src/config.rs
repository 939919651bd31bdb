//! Scene geometry and simulation tunables.
//! Everything the reducer or the renderer treats as a knob lives here as a
//! named constant; no magic ceilings are spread across modules.

/// Logical canvas size. The element is scaled by CSS; pointer coordinates
/// are mapped back through `state::Viewport`.
pub const SCENE_W: f64 = 1200.0;
pub const SCENE_H: f64 = 600.0;

/// Horizon line: sky above, ground strip below.
pub const GROUND_Y: f64 = 420.0;
pub const GROUND_BOTTOM_Y: f64 = 545.0;

// Road band (two lanes, dashed centerline between them).
pub const ROAD_TOP_Y: f64 = 470.0;
pub const ROAD_BOTTOM_Y: f64 = 530.0;
pub const ROAD_CENTER_Y: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingSpec {
    pub x: f64,
    pub w: f64,
    pub h: f64,
}

/// Residential buildings, left to right. Heights are measured up from
/// `GROUND_Y`.
pub const BUILDINGS: [BuildingSpec; 4] = [
    BuildingSpec { x: 80.0, w: 120.0, h: 180.0 },
    BuildingSpec { x: 230.0, w: 100.0, h: 220.0 },
    BuildingSpec { x: 380.0, w: 160.0, h: 200.0 },
    BuildingSpec { x: 560.0, w: 130.0, h: 240.0 },
];

// Rooftop drop zone for solar panels.
pub const ROOF_ZONE_PADDING_X: f64 = 8.0;
pub const ROOF_ZONE_HEIGHT: f64 = 30.0;
pub const ROOF_ZONE_GAP: f64 = 4.0;

// Recycling drop zone sits between the second and third building.
pub const RECYCLING_ZONE_W: f64 = 100.0;
pub const RECYCLING_ZONE_H: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChimneySpec {
    pub x_off: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FactorySpec {
    pub x: f64,
    pub w: f64,
    pub h: f64,
    pub chimneys: &'static [ChimneySpec],
}

/// Factory silhouettes on the right edge of the scene. Smoke outlets sit a
/// few pixels above each chimney mouth.
pub const FACTORY_BASE_Y: f64 = 408.0;
pub const FACTORIES: [FactorySpec; 3] = [
    FactorySpec {
        x: 760.0,
        w: 120.0,
        h: 62.0,
        chimneys: &[ChimneySpec { x_off: 18.0, w: 14.0, h: 54.0 }],
    },
    FactorySpec {
        x: 910.0,
        w: 150.0,
        h: 70.0,
        chimneys: &[
            ChimneySpec { x_off: 24.0, w: 16.0, h: 60.0 },
            ChimneySpec { x_off: 80.0, w: 14.0, h: 50.0 },
        ],
    },
    FactorySpec {
        x: 1080.0,
        w: 120.0,
        h: 60.0,
        chimneys: &[ChimneySpec { x_off: 22.0, w: 14.0, h: 52.0 }],
    },
];
pub const CHIMNEY_OUTLET_RISE: f64 = 6.0;

// Mitigation contributions. The cap intentionally leaves residual smoke
// visible even with every contribution active.
pub const MITIGATION_CAP: f64 = 0.5;
pub const PANEL_MITIGATION: f64 = 0.1;
pub const RECYCLING_MITIGATION: f64 = 0.1;
pub const TRANSIT_MITIGATION: f64 = 0.15;
pub const SMILE_BOOST_AMOUNT: f64 = 0.3;
pub const SMILE_BOOST_DURATION_MS: f64 = 2000.0;

// Frame clock. Deltas are clamped before any time integration so a
// backgrounded tab cannot fast-forward the simulation on resume.
pub const MAX_FRAME_MS: f64 = 50.0;
pub const REF_FRAME_MS: f64 = 16.67;
pub const SIM_TICK_MS: i32 = 16;

// Day/night cycle: four equal quarters (day, sunset, night, sunrise).
pub const DAY_NIGHT_CYCLE_MS: f64 = 60_000.0;

// Factory smoke. Floors keep fumes visible at full mitigation.
pub const FACTORY_SMOKE_RATE_PER_SEC: f64 = 2.5;
pub const SMOKE_SPAWN_FLOOR: f64 = 0.6;
pub const SMOKE_SIZE_FLOOR: f64 = 0.7;
pub const SMOKE_GROWTH_FLOOR: f64 = 0.75;

// Plant growth interpolation.
pub const GROWTH_FLOOR: f64 = 0.1;
pub const GROWTH_TRANSITION_SPEED: f64 = 0.035;
pub const GROWTH_SNAP_EPSILON: f64 = 0.001;
pub const GROWTH_TARGET_EPSILON: f64 = 0.0001;

// Bus.
pub const BUS_W: f64 = 120.0;
pub const BUS_H: f64 = 30.0;
pub const BUS_SPEED: f64 = 0.18;
pub const BUS_WRAP_MARGIN: f64 = 80.0;
pub const BUS_SPAWN_X: f64 = 80.0;
pub const BUS_SHOWN_X: f64 = 120.0;
pub const BUS_SPAWN_Y: f64 = SCENE_H - 90.0;
pub const BUS_LANE_EASE: f64 = 0.2;

// Ambient cars.
pub const CAR_SPAWN_GAP_MIN_MS: f64 = 900.0;
pub const CAR_SPAWN_GAP_JITTER_MS: f64 = 1400.0;
pub const CAR_EXHAUST_INTERVAL_MS: f64 = 120.0;
pub const CAR_DESPAWN_MARGIN: f64 = 40.0;
pub const CAR_LANE_TOP_Y: f64 = 488.0;
pub const CAR_LANE_BOTTOM_Y: f64 = 512.0;

// Night sky.
pub const STAR_COUNT: usize = 80;

// Entity spawn positions along the bottom tray of the scene.
pub const PANEL_TRAY_X: f64 = 100.0;
pub const PANEL_TRAY_STEP: f64 = 200.0;
pub const PANEL_TRAY_Y: f64 = SCENE_H - 45.0;
pub const PANEL_WIDTH_RATIO: f64 = 0.8;
pub const PANEL_HEIGHT: f64 = 40.0;

pub const BIN_W: f64 = 30.0;
pub const BIN_SPACING: f64 = 5.0;
pub const BIN_H: f64 = 40.0;
pub const BIN_TRAY_X: f64 = 150.0;
pub const BIN_TRAY_Y: f64 = SCENE_H - 50.0;
