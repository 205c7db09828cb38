//! Painting the positioned cards through the camera

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};
use glam::{Mat4, Vec3};
use serde_json::Value;
use sn_engine::SpatialEngine;

const PALETTE: [Color32; 6] = [
    Color32::from_rgb(66, 133, 180),
    Color32::from_rgb(196, 110, 62),
    Color32::from_rgb(88, 160, 96),
    Color32::from_rgb(160, 92, 170),
    Color32::from_rgb(190, 160, 60),
    Color32::from_rgb(80, 170, 170),
];

/// Clip-space projection to screen; `None` behind the camera
fn project(view_proj: &Mat4, rect: Rect, point: Vec3) -> Option<(Pos2, f32)> {
    let clip = *view_proj * point.extend(1.0);
    if clip.w <= 1e-4 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let pos = Pos2::new(
        rect.left() + (ndc.x + 1.0) * 0.5 * rect.width(),
        rect.top() + (1.0 - ndc.y) * 0.5 * rect.height(),
    );
    Some((pos, ndc.z))
}

struct Card {
    corners: Vec<Pos2>,
    center: Pos2,
    depth: f32,
    index: usize,
}

fn card_label(engine: &SpatialEngine<Value>, index: usize, detailed: bool) -> String {
    let Some(item) = engine.index().get(index) else {
        return String::new();
    };
    let caption = item.payload.get("caption").and_then(Value::as_str);
    match (detailed, caption) {
        (true, Some(caption)) => format!("{}\n{}", caption, item.id),
        (false, Some(caption)) => caption.to_string(),
        _ => item.id.clone(),
    }
}

/// Paint every card at its animated transform, far to near
pub fn paint_cards(painter: &Painter, rect: Rect, engine: &SpatialEngine<Value>, detailed: bool) {
    let Some(snapshot) = engine.snapshot() else {
        return;
    };
    let animator = engine.animator();
    let view_proj = engine.rig().view_projection();
    let group = animator.group_transform().matrix();
    let half = snapshot.item_size * 0.5;
    let local = [
        Vec3::new(-half.x, -half.y, 0.0),
        Vec3::new(half.x, -half.y, 0.0),
        Vec3::new(half.x, half.y, 0.0),
        Vec3::new(-half.x, half.y, 0.0),
    ];

    let mut cards: Vec<Card> = (0..animator.len())
        .filter_map(|index| {
            let world = group * animator.item_transform(index)?.matrix();
            let mut corners = Vec::with_capacity(4);
            let mut depth = 0.0;
            for corner in local {
                let (pos, z) = project(&view_proj, rect, world.transform_point3(corner))?;
                corners.push(pos);
                depth += z * 0.25;
            }
            let (center, _) = project(&view_proj, rect, world.transform_point3(Vec3::ZERO))?;
            Some(Card {
                corners,
                center,
                depth,
                index,
            })
        })
        .collect();
    cards.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let active = engine.active_item().map(|item| item.global_index);
    for card in cards {
        let category = engine
            .index()
            .get(card.index)
            .map(|item| item.category_index)
            .unwrap_or(0);
        let base = PALETTE[category % PALETTE.len()];
        let is_active = active == Some(card.index);
        let (fill, stroke) = if is_active {
            (base, Stroke::new(3.0, Color32::WHITE))
        } else {
            (base.gamma_multiply(0.55), Stroke::new(1.0, Color32::from_gray(30)))
        };

        painter.add(Shape::convex_polygon(card.corners, fill, stroke));
        painter.text(
            card.center,
            Align2::CENTER_CENTER,
            card_label(engine, card.index, detailed),
            FontId::proportional(if is_active { 15.0 } else { 12.0 }),
            Color32::from_gray(235),
        );
    }
}
