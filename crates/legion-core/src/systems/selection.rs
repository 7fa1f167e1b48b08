//! Selection system - pointer hover, click selection and move commands.
//!
//! Hit-testing uses each group's expanded-hull bounding box.

use hecs::{Entity, World};
use legion_logic::geometry::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{Follows, HullCache, MaxSpeed, MoveTarget, Selection};
use crate::generation::groups_in_spawn_order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Pointer tracking between input events
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub dragging: bool,
}

impl PointerState {
    pub fn moved(&mut self, world: &mut World, point: Vec2) {
        self.position = point;
        hover_system(world, point);
        if self.dragging {
            if let Some(selected) = selected_group(world) {
                command_move(world, selected, point);
            }
        }
    }

    pub fn pressed(&mut self, world: &mut World, point: Vec2, button: PointerButton) {
        self.position = point;
        match button {
            PointerButton::Primary => match group_at(world, point) {
                Some(hit) => {
                    select_only(world, hit);
                    self.dragging = true;
                }
                None => {
                    if let Some(selected) = selected_group(world) {
                        command_move(world, selected, point);
                    }
                }
            },
            PointerButton::Secondary => {
                clear_selection(world);
                self.dragging = false;
            }
        }
    }

    pub fn released(&mut self, button: PointerButton) {
        if button == PointerButton::Primary {
            self.dragging = false;
        }
    }
}

/// Mark every selectable group hovered iff its bounds contain `point`
pub fn hover_system(world: &mut World, point: Vec2) {
    for (_, (selection, hull)) in world.query_mut::<(&mut Selection, &HullCache)>() {
        selection.hovered = selection.selectable && hull.bounds().contains(&point);
    }
}

/// First selectable group, in spawn order, whose bounds contain `point`
pub fn group_at(world: &World, point: Vec2) -> Option<Entity> {
    groups_in_spawn_order(world).into_iter().find(|&entity| {
        let Ok(mut query) = world.query_one::<(&Selection, &HullCache)>(entity) else {
            return false;
        };
        let hit = query
            .get()
            .map(|(selection, hull)| selection.selectable && hull.bounds().contains(&point))
            .unwrap_or(false);
        hit
    })
}

/// First selected group in spawn order
pub fn selected_group(world: &World) -> Option<Entity> {
    groups_in_spawn_order(world).into_iter().find(|&entity| {
        world
            .get::<&Selection>(entity)
            .map(|s| s.selected)
            .unwrap_or(false)
    })
}

pub fn select_only(world: &mut World, entity: Entity) {
    for (e, selection) in world.query_mut::<&mut Selection>() {
        selection.selected = e == entity && selection.selectable;
    }
}

pub fn clear_selection(world: &mut World) {
    for (_, selection) in world.query_mut::<&mut Selection>() {
        selection.selected = false;
    }
}

/// Give an entity a directed move. Aura groups forward the command to the
/// unit they follow. Returns false when nothing can take the command.
pub fn command_move(world: &mut World, entity: Entity, point: Vec2) -> bool {
    let mover = match world.get::<&Follows>(entity) {
        Ok(follows) => follows.0,
        Err(_) => entity,
    };
    if world.get::<&MaxSpeed>(mover).is_err() {
        return false;
    }
    world.insert_one(mover, MoveTarget(point)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GroupKind;
    use crate::components::UnitKind;
    use crate::context::SimContext;
    use crate::generation::{spawn_group, spawn_unit, GroupSpawn};
    use legion_logic::config::SimConfig;
    use legion_logic::faction::Owner;

    fn square(world: &mut World, ctx: &mut SimContext, kind: GroupKind, at: Vec2) -> Entity {
        let offsets = [
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-10.0, 10.0),
        ];
        spawn_group(world, ctx, GroupSpawn::new(kind, Owner::PLAYER, at).with_offsets(&offsets, 5.0)).unwrap()
    }

    #[test]
    fn test_hover_uses_expanded_bounds() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let g = square(&mut world, &mut ctx, GroupKind::PlayerControlled, Vec2::ZERO);

        // Outside the raw hull, inside the padded one
        hover_system(&mut world, Vec2::new(20.0, 0.0));
        assert!(world.get::<&Selection>(g).unwrap().hovered);

        hover_system(&mut world, Vec2::new(60.0, 0.0));
        assert!(!world.get::<&Selection>(g).unwrap().hovered);
    }

    #[test]
    fn test_enemy_groups_ignore_pointer() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let g = square(&mut world, &mut ctx, GroupKind::Enemy, Vec2::ZERO);
        hover_system(&mut world, Vec2::ZERO);
        assert!(!world.get::<&Selection>(g).unwrap().hovered);
        assert_eq!(group_at(&world, Vec2::ZERO), None);
    }

    #[test]
    fn test_click_select_then_command() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let a = square(&mut world, &mut ctx, GroupKind::PlayerControlled, Vec2::ZERO);
        let b = square(&mut world, &mut ctx, GroupKind::PlayerControlled, Vec2::new(200.0, 0.0));
        let mut pointer = PointerState::default();

        pointer.pressed(&mut world, Vec2::new(200.0, 0.0), PointerButton::Primary);
        assert!(pointer.dragging);
        assert!(world.get::<&Selection>(b).unwrap().selected);
        assert!(!world.get::<&Selection>(a).unwrap().selected);

        pointer.moved(&mut world, Vec2::new(210.0, 5.0));
        assert_eq!(world.get::<&MoveTarget>(b).unwrap().0, Vec2::new(210.0, 5.0));

        pointer.released(PointerButton::Primary);
        assert!(!pointer.dragging);

        // Click on empty ground sends the selection there
        pointer.pressed(&mut world, Vec2::new(500.0, 500.0), PointerButton::Primary);
        assert_eq!(world.get::<&MoveTarget>(b).unwrap().0, Vec2::new(500.0, 500.0));
        assert!(world.get::<&MoveTarget>(a).is_err());

        pointer.pressed(&mut world, Vec2::ZERO, PointerButton::Secondary);
        assert_eq!(selected_group(&world), None);
    }

    #[test]
    fn test_aura_command_moves_unit() {
        let mut world = World::new();
        let mut ctx = SimContext::new(SimConfig::default(), 0);
        let unit = spawn_unit(&mut world, &mut ctx, UnitKind::Player, Owner::PLAYER, Vec2::ZERO);
        let aura = world.get::<&crate::components::Unit>(unit).unwrap().aura.unwrap();

        assert!(command_move(&mut world, aura, Vec2::new(40.0, 0.0)));
        assert_eq!(world.get::<&MoveTarget>(unit).unwrap().0, Vec2::new(40.0, 0.0));
        assert!(world.get::<&MoveTarget>(aura).is_err());
    }

    #[test]
    fn test_command_unknown_entity() {
        let mut world = World::new();
        let ghost = world.spawn((Selection::default(),));
        world.despawn(ghost).unwrap();
        assert!(!command_move(&mut world, ghost, Vec2::ZERO));
    }
}
