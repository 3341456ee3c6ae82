//! Shape generation for 2D primitives
//!
//! Everything is built in screen pixels (origin top-left, y down); the pipeline
//! maps to NDC on upload.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::config::GameConfig;
use crate::menu;
use crate::sim::collision::Aabb;
use crate::sim::{GamePhase, ObstacleKind, Snapshot};

/// Width of the neon lane edge lines
const EDGE_WIDTH: f32 = 4.0;
/// Width of a centre-line stripe
const STRIPE_WIDTH: f32 = 6.0;
const BUTTON_BORDER: f32 = 2.0;
/// HUD gauge geometry (top-left corner)
const GAUGE_ORIGIN: Vec2 = Vec2::new(20.0, 20.0);
const GAUGE_SIZE: Vec2 = Vec2::new(160.0, 12.0);
const PIP_SIZE: f32 = 10.0;
const PIP_GAP: f32 = 4.0;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a rectangle outline drawn inside `bounds`
pub fn rect_outline(bounds: &Aabb, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (bounds.min(), bounds.max());
    let t = thickness.min(bounds.half_extents.x).min(bounds.half_extents.y);

    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(min, Vec2::new(max.x, min.y + t), color));
    vertices.extend(rect(Vec2::new(min.x, max.y - t), max, color));
    vertices.extend(rect(
        Vec2::new(min.x, min.y + t),
        Vec2::new(min.x + t, max.y - t),
        color,
    ));
    vertices.extend(rect(
        Vec2::new(max.x - t, min.y + t),
        Vec2::new(max.x, max.y - t),
        color,
    ));
    vertices
}

fn aabb(bounds: &Aabb, color: [f32; 4]) -> Vec<Vertex> {
    rect(bounds.min(), bounds.max(), color)
}

fn road(config: &GameConfig, frame: &Snapshot) -> Vec<Vertex> {
    let lane = config.lane();
    let h = config.screen_height;

    let mut vertices = rect(Vec2::ZERO, Vec2::new(config.screen_width, h), colors::ROADSIDE);
    vertices.extend(rect(
        Vec2::new(lane.left, 0.0),
        Vec2::new(lane.right, h),
        colors::ROAD,
    ));

    for x in [lane.left, lane.right] {
        vertices.extend(rect(
            Vec2::new(x - EDGE_WIDTH * 0.5, 0.0),
            Vec2::new(x + EDGE_WIDTH * 0.5, h),
            colors::LANE_EDGE,
        ));
    }

    let cx = lane.center();
    for &y in &frame.stripes {
        vertices.extend(rect(
            Vec2::new(cx - STRIPE_WIDTH * 0.5, y),
            Vec2::new(cx + STRIPE_WIDTH * 0.5, y + config.stripe_length),
            colors::STRIPE,
        ));
    }
    vertices
}

fn player(frame: &Snapshot) -> Vec<Vertex> {
    let body = frame.player.bounds();
    let mut vertices = aabb(&body, colors::PLAYER);

    // Windshield across the upper third
    let (min, max) = (body.min(), body.max());
    let inset = body.half_extents.x * 0.3;
    let size = max - min;
    vertices.extend(rect(
        Vec2::new(min.x + inset, min.y + size.y * 0.15),
        Vec2::new(max.x - inset, min.y + size.y * 0.35),
        colors::PLAYER_WINDOW,
    ));
    vertices
}

fn obstacles(frame: &Snapshot) -> Vec<Vertex> {
    frame
        .obstacles
        .iter()
        .flat_map(|o| {
            let color = match o.kind {
                ObstacleKind::Car => colors::CAR,
                ObstacleKind::Barrier => colors::BARRIER,
            };
            aabb(&o.bounds(), color)
        })
        .collect()
}

/// Speed gauge and one pip per level
fn hud(config: &GameConfig, frame: &Snapshot) -> Vec<Vertex> {
    let fill = (frame.speed / config.max_speed).clamp(0.0, 1.0);
    let mut vertices = rect(
        GAUGE_ORIGIN,
        GAUGE_ORIGIN + Vec2::new(GAUGE_SIZE.x * fill, GAUGE_SIZE.y),
        colors::SPEED_GAUGE,
    );

    let top = GAUGE_ORIGIN.y + GAUGE_SIZE.y + PIP_GAP;
    for i in 0..frame.level {
        let x = GAUGE_ORIGIN.x + i as f32 * (PIP_SIZE + PIP_GAP);
        vertices.extend(rect(
            Vec2::new(x, top),
            Vec2::new(x + PIP_SIZE, top + PIP_SIZE),
            colors::LEVEL_PIP,
        ));
    }
    vertices
}

fn buttons(config: &GameConfig, frame: &Snapshot) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for button in menu::buttons(frame.phase, config) {
        let fill = if frame.hovered == Some(button.action) {
            colors::BUTTON_HOVER
        } else {
            colors::BUTTON
        };
        vertices.extend(aabb(&button.bounds, fill));
        vertices.extend(rect_outline(
            &button.bounds,
            BUTTON_BORDER,
            colors::BUTTON_BORDER,
        ));
    }
    vertices
}

/// Build the whole frame, back to front
pub fn scene(frame: &Snapshot, config: &GameConfig) -> Vec<Vertex> {
    let mut vertices = road(config, frame);
    vertices.extend(obstacles(frame));
    vertices.extend(player(frame));
    match frame.phase {
        GamePhase::Playing => vertices.extend(hud(config, frame)),
        GamePhase::Start | GamePhase::GameOver => vertices.extend(buttons(config, frame)),
    }
    vertices
}
