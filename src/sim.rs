use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::ball::Ball;

/// Whether gravity is applied to the vertical velocity each tick.
pub const IS_AFFECTED_BY_GRAVITY: bool = true;
/// Fraction of horizontal velocity kept after touching the floor or ceiling.
pub const SURFACE_FRICTION: f64 = 0.99;
/// Fraction of velocity kept (and reversed) after hitting an edge.
pub const ELASTICITY: f64 = 0.5;
/// Gravity, spread over one second of ticks.
pub const GRAVITY_ACCEL: f64 = 9.6;
pub const BALL_DIAMETER: f64 = 300.0;
pub const INITIAL_POSITION: DVec2 = DVec2::new(100.0, 100.0);
pub const INITIAL_VELOCITY: DVec2 = DVec2::new(12.0, 12.0);
pub const TICKS_PER_SECOND: f64 = 60.0;

pub struct SimPlugin;
impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimSettings>()
            .init_resource::<Simulator>()
            .init_resource::<SimStats>()
            .init_resource::<Viewport>()
            .add_event::<ResetEvent>()
            .add_systems(Startup, spawn_ball)
            .add_systems(PreUpdate, sync_viewport)
            .add_systems(Update, handle_reset)
            .add_systems(FixedUpdate, tick_ball);

        let hz = app.world().resource::<SimSettings>().ticks_per_second;
        app.insert_resource(Time::<Fixed>::from_hz(hz));
    }
}

#[derive(Event, Default)]
pub struct ResetEvent;

/// Fixed scene constants plus the few runtime toggles the controls flip.
#[derive(Resource, Clone, Debug)]
pub struct SimSettings {
    pub diameter: f64,
    pub initial_position: DVec2,
    pub initial_velocity: DVec2,
    pub ticks_per_second: f64,
    pub running: bool,
    pub show_help: bool,
    pub show_diagnostics: bool,
}
impl Default for SimSettings {
    fn default() -> Self {
        Self {
            diameter: BALL_DIAMETER,
            initial_position: INITIAL_POSITION,
            initial_velocity: INITIAL_VELOCITY,
            ticks_per_second: TICKS_PER_SECOND,
            running: true,
            show_help: false,
            show_diagnostics: false,
        }
    }
}

impl SimSettings {
    pub fn spawn_ball(&self) -> Ball {
        Ball::new(self.initial_position, self.diameter, self.initial_velocity)
    }
}

#[derive(Resource, Default, Debug)]
pub struct SimStats {
    pub ticks: u64,
    pub skipped: u64,
}

/// Drawable area in logical pixels, refreshed from the primary window.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}
impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a ball of `diameter` has room to move at all. Stepping a ball in
    /// a viewport that fails this has no meaningful result.
    pub fn fits(&self, diameter: f64) -> bool {
        self.width > 0.0 && self.height > 0.0 && diameter <= self.width && diameter <= self.height
    }

    /// Pulls the ball back inside after the viewport shrank under it.
    /// Velocity is left alone.
    pub fn clamp(&self, ball: &mut Ball) {
        ball.position.x = ball.position.x.clamp(0.0, (self.width - ball.diameter).max(0.0));
        ball.position.y = ball.position.y.clamp(0.0, (self.height - ball.diameter).max(0.0));
    }
}

/// Per-tick physics: Euler step, edge bounce with elasticity, floor friction,
/// then gravity.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Simulator {
    pub elasticity: f64,
    pub surface_friction: f64,
    pub gravity_enabled: bool,
    pub gravity_accel: f64,
}
impl Default for Simulator {
    fn default() -> Self {
        Self {
            elasticity: ELASTICITY,
            surface_friction: SURFACE_FRICTION,
            gravity_enabled: IS_AFFECTED_BY_GRAVITY,
            gravity_accel: GRAVITY_ACCEL,
        }
    }
}

impl Simulator {
    /// Velocity added to `dy` on every tick.
    pub fn gravity_step(&self, steps_per_second: f64) -> f64 {
        self.gravity_accel / steps_per_second
    }

    /// Advances `ball` by exactly one tick.
    ///
    /// A collision undoes that axis' displacement for this tick rather than
    /// snapping to the edge, so a ball that is already clipped past an edge
    /// stays clipped until its velocity carries it back.
    pub fn update(&self, ball: &mut Ball, width: f64, height: f64, steps_per_second: f64) {
        debug_assert!(steps_per_second > 0.0, "tick rate must be positive");

        ball.position += ball.velocity;

        if ball.position.x < 0.0 || ball.max_x() > width {
            ball.position.x -= ball.velocity.x;
            ball.velocity.x = -ball.velocity.x * self.elasticity;
        }

        if ball.position.y < 0.0 || ball.max_y() > height {
            ball.position.y -= ball.velocity.y;
            ball.velocity.y = -ball.velocity.y * self.elasticity;
            // Only contact with the floor (or ceiling) bleeds horizontal speed.
            ball.velocity.x *= self.surface_friction;
        }

        if self.gravity_enabled {
            ball.velocity.y += self.gravity_step(steps_per_second);
        }
    }
}

pub fn spawn_ball(mut commands: Commands, settings: Res<SimSettings>) {
    let ball = settings.spawn_ball();
    info!(
        "dropping ball at ({}, {}) with velocity ({}, {})",
        ball.position.x, ball.position.y, ball.velocity.x, ball.velocity.y
    );
    commands.spawn(ball);
}

fn sync_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
    mut q: Query<&mut Ball>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let next = Viewport::new(window.width() as f64, window.height() as f64);
    if next == *viewport {
        return;
    }
    debug!("viewport resized to {}x{}", next.width, next.height);
    *viewport = next;

    for mut ball in &mut q {
        if next.fits(ball.diameter) && !ball.within(next) {
            next.clamp(&mut *ball);
        }
    }
}

pub fn handle_reset(
    mut ev_reset: EventReader<ResetEvent>,
    settings: Res<SimSettings>,
    mut q: Query<&mut Ball>,
) {
    if ev_reset.is_empty() {
        return;
    }
    ev_reset.clear();

    for mut ball in &mut q {
        ball.reset(settings.initial_position, settings.initial_velocity);
    }
    info!("ball re-dropped");
}

pub fn tick_ball(
    sim: Res<Simulator>,
    settings: Res<SimSettings>,
    viewport: Res<Viewport>,
    mut stats: ResMut<SimStats>,
    mut degenerate: Local<bool>,
    mut q: Query<&mut Ball>,
) {
    if !settings.running {
        return;
    }
    let Ok(mut ball) = q.get_single_mut() else {
        return;
    };

    if !viewport.fits(ball.diameter) {
        if !*degenerate {
            warn!(
                "viewport {}x{} cannot hold a ball of diameter {}, pausing physics",
                viewport.width, viewport.height, ball.diameter
            );
            *degenerate = true;
        }
        stats.skipped += 1;
        return;
    }
    if *degenerate {
        info!("viewport usable again, resuming physics");
        *degenerate = false;
    }

    sim.update(
        &mut ball,
        viewport.width,
        viewport.height,
        settings.ticks_per_second,
    );
    stats.ticks += 1;
    trace!(
        tick = stats.ticks,
        x = ball.position.x,
        y = ball.position.y,
        dx = ball.velocity.x,
        dy = ball.velocity.y,
        "ball stepped"
    );
}
