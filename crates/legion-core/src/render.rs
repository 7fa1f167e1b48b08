//! Render snapshot - everything a renderer needs for one frame.
//!
//! The engine never draws. A [`Renderer`] receives a [`RenderFrame`] built
//! from the world and decides how to present it.

use hecs::{Entity, World};
use legion_logic::color::Color;
use legion_logic::geometry::{Bounds, Vec2};
use serde::Serialize;

use crate::components::*;
use crate::context::SimContext;
use crate::generation::groups_in_spawn_order;

/// Hull fill/outline treatment for a group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum HullStyle {
    Hidden,
    /// Translucent white fill
    Hover { fill: Color, fill_alpha: f32 },
    /// Translucent group-colored fill plus a solid outline
    Selected {
        fill: Color,
        fill_alpha: f32,
        outline_alpha: f32,
        outline_width: f32,
    },
}

impl HullStyle {
    pub const FILL_ALPHA: f32 = 0.5;
    pub const OUTLINE_ALPHA: f32 = 1.0;
    pub const OUTLINE_WIDTH: f32 = 5.0;

    /// Selection wins over hover
    pub fn for_selection(selection: &Selection, group_color: Color) -> Self {
        if selection.selected {
            HullStyle::Selected {
                fill: group_color,
                fill_alpha: Self::FILL_ALPHA,
                outline_alpha: Self::OUTLINE_ALPHA,
                outline_width: Self::OUTLINE_WIDTH,
            }
        } else if selection.hovered {
            HullStyle::Hover {
                fill: Color::WHITE,
                fill_alpha: Self::FILL_ALPHA,
            }
        } else {
            HullStyle::Hidden
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemberView {
    pub position: Vec2,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    #[serde(skip)]
    pub entity: Option<Entity>,
    pub kind: GroupKind,
    pub anchor: Vec2,
    pub hull: Vec<Vec2>,
    pub bounds: Bounds,
    pub members: Vec<MemberView>,
    pub style: HullStyle,
    /// Draw the pulsing combat ring
    pub engaged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitView {
    pub kind: UnitKind,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttackView {
    pub position: Vec2,
    pub origin: Vec2,
    pub destination: Vec2,
    pub color: Color,
    pub alpha: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderFrame {
    pub sim_time: f64,
    pub groups: Vec<GroupView>,
    pub units: Vec<UnitView>,
    pub attacks: Vec<AttackView>,
}

/// Presentation collaborator
pub trait Renderer {
    fn draw(&mut self, frame: &RenderFrame);
}

/// Build a frame from the current world, groups in spawn order and
/// tracers oldest first.
pub fn build_frame(world: &World, ctx: &SimContext) -> RenderFrame {
    let mut frame = RenderFrame {
        sim_time: ctx.sim_time,
        attacks: ctx
            .tracers
            .iter()
            .map(|e| AttackView {
                position: e.position(),
                origin: e.origin,
                destination: e.destination,
                color: e.color,
                alpha: e.alpha(),
            })
            .collect(),
        ..Default::default()
    };

    for entity in groups_in_spawn_order(world) {
        let Ok(mut query) =
            world.query_one::<(&Group, &Members, &HullCache, &Position, &Selection, &CombatState)>(entity)
        else {
            continue;
        };
        let Some((group, members, hull, pos, selection, combat)) = query.get() else {
            continue;
        };

        frame.groups.push(GroupView {
            entity: Some(entity),
            kind: group.kind,
            anchor: pos.0,
            hull: hull.0.expanded.clone(),
            bounds: hull.bounds(),
            members: members
                .0
                .iter()
                .map(|m| MemberView {
                    position: pos.0 + m.pos,
                    color: m.color,
                })
                .collect(),
            style: HullStyle::for_selection(selection, group.color),
            engaged: combat.in_combat,
        });
    }

    let mut units: Vec<(SpawnOrder, UnitView)> = world
        .query::<(&Unit, &Position, &SpawnOrder)>()
        .iter()
        .map(|(_, (unit, pos, order))| {
            (
                *order,
                UnitView {
                    kind: unit.kind,
                    position: pos.0,
                },
            )
        })
        .collect();
    units.sort_by_key(|(order, _)| *order);
    frame.units = units.into_iter().map(|(_, view)| view).collect();

    frame
}
