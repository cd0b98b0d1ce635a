use bevy::color::{LinearRgba, Mix, Srgba};
use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use crate::ball::Ball;
use crate::sim::{handle_reset, Viewport};

/// Colour at the lit spot.
pub const BASE_COLOR: Srgba = Srgba::rgb(1.0, 0.0, 0.0);
/// Darkest the gradient gets, reached one radius from the lit spot.
pub const SHADOWED_COLOR: Srgba = Srgba::rgb(50.0 / 255.0, 0.0, 0.0);
/// How far across the ball the lit spot travels as the ball crosses the screen.
pub const LIGHT_OFFSET_MULTIPLIER: f64 = 0.4;
/// Centres that travel range on the middle of the ball.
pub const LIGHT_OFFSET: f64 = -(LIGHT_OFFSET_MULTIPLIER / 2.0);

const RINGS: u32 = 16;
const SEGMENTS: u32 = 96;

pub struct DiscPlugin;
impl Plugin for DiscPlugin {
    fn build(&self, app: &mut App) {
        // Runs in Update, after the frame's FixedUpdate ticks have finished.
        app.add_systems(Update, (attach_disc, sync_disc).chain().after(handle_reset));
    }
}

/// Mesh-local vertex positions (y up, centred on the ball), kept so the
/// shading pass doesn't have to read them back out of the mesh.
#[derive(Component)]
pub struct Disc {
    points: Vec<Vec2>,
}

/// World-space centre of the ball. The camera sits at the window centre with
/// y up; the simulation works from the top-left with y down.
pub fn world_translation(ball: &Ball, viewport: Viewport) -> Vec2 {
    let c = ball.center();
    Vec2::new(
        (c.x - viewport.width * 0.5) as f32,
        (viewport.height * 0.5 - c.y) as f32,
    )
}

/// Screen-space centre of the highlight. It slides from the lower right of the
/// ball at the left edge of the window to the upper left at the right edge, as
/// if lit by a fixed lamp. Both axes follow the horizontal position.
pub fn light_center(ball: &Ball, viewport: Viewport) -> DVec2 {
    let c = ball.center();
    let f = c.x / viewport.width * LIGHT_OFFSET_MULTIPLIER + LIGHT_OFFSET;
    c - DVec2::splat(ball.diameter * f)
}

/// Gradient colour `t` radii away from the lit spot. No cycling past 1.
pub fn shade(t: f32) -> Srgba {
    BASE_COLOR.mix(&SHADOWED_COLOR, t.clamp(0.0, 1.0))
}

fn disc_points(diameter: f64) -> Vec<Vec2> {
    let radius = (diameter * 0.5) as f32;
    let mut points = Vec::with_capacity(1 + (RINGS * SEGMENTS) as usize);
    points.push(Vec2::ZERO);
    for ring in 1..=RINGS {
        let r = radius * ring as f32 / RINGS as f32;
        for seg in 0..SEGMENTS {
            let ang = seg as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
            points.push(Vec2::from_angle(ang) * r);
        }
    }
    points
}

fn ring_vertex(ring: u32, seg: u32) -> u32 {
    1 + (ring - 1) * SEGMENTS + seg % SEGMENTS
}

fn disc_indices() -> Vec<u32> {
    let mut indices = Vec::with_capacity((3 * SEGMENTS + 6 * SEGMENTS * (RINGS - 1)) as usize);
    for seg in 0..SEGMENTS {
        indices.extend([0, ring_vertex(1, seg), ring_vertex(1, seg + 1)]);
    }
    for ring in 1..RINGS {
        for seg in 0..SEGMENTS {
            let a = ring_vertex(ring, seg);
            let b = ring_vertex(ring, seg + 1);
            let c = ring_vertex(ring + 1, seg);
            let d = ring_vertex(ring + 1, seg + 1);
            indices.extend([a, c, d, a, d, b]);
        }
    }
    indices
}

/// Polar grid mesh with counter-clockwise winding; colours start white and are
/// replaced every frame by [`vertex_colors`].
pub fn disc_mesh(points: &[Vec2]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| [p.x, p.y, 0.0]).collect();
    let colors = vec![[1.0, 1.0, 1.0, 1.0]; points.len()];
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
        .with_inserted_indices(Indices::U32(disc_indices()))
}

pub fn vertex_colors(points: &[Vec2], ball: &Ball, viewport: Viewport) -> Vec<[f32; 4]> {
    let radius = ball.diameter * 0.5;
    let light = light_center(ball, viewport) - ball.center();
    points
        .iter()
        .map(|p| {
            // Mesh space is y up, the light offset is in screen space.
            let screen = DVec2::new(p.x as f64, -p.y as f64);
            let t = (screen - light).length() / radius;
            let c = LinearRgba::from(shade(t as f32));
            [c.red, c.green, c.blue, c.alpha]
        })
        .collect()
}

fn attach_disc(
    mut commands: Commands,
    q: Query<(Entity, &Ball), Added<Ball>>,
    viewport: Res<Viewport>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (e, ball) in &q {
        let points = disc_points(ball.diameter);
        let mesh = meshes.add(disc_mesh(&points));
        commands.entity(e).insert((
            Disc { points },
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(mesh),
                material: materials.add(ColorMaterial::default()),
                transform: Transform::from_translation(
                    world_translation(ball, *viewport).extend(0.0),
                ),
                ..default()
            },
        ));
    }
}

fn sync_disc(
    viewport: Res<Viewport>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut q: Query<(&Ball, &Disc, &Mesh2dHandle, &mut Transform)>,
) {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return;
    }
    for (ball, disc, handle, mut t) in &mut q {
        let pos = world_translation(ball, *viewport);
        t.translation.x = pos.x;
        t.translation.y = pos.y;

        if let Some(mesh) = meshes.get_mut(&handle.0) {
            mesh.insert_attribute(
                Mesh::ATTRIBUTE_COLOR,
                vertex_colors(&disc.points, ball, *viewport),
            );
        }
    }
}
