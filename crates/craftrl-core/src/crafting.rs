//! Crafting - turning recipe parts into products.

use hecs::Entity;

use crate::components::Inventory;
use crate::definitions::RecipeDef;
use crate::error::CraftError;
use crate::world::World;

/// Total quantity of each part `recipe` needs, in first-listed order.
/// Rows naming the same item are summed.
fn required_parts(recipe: &RecipeDef) -> Vec<(i32, i32)> {
    let mut totals: Vec<(i32, i32)> = Vec::new();
    for part in recipe.parts.iter().filter(|p| p.qty > 0) {
        match totals.iter_mut().find(|(ident, _)| *ident == part.ident) {
            Some((_, qty)) => *qty += part.qty,
            None => totals.push((part.ident, part.qty)),
        }
    }
    totals
}

/// The first part of `recipe` that `inventory` is short of
pub fn check_parts(inventory: &Inventory, recipe: &RecipeDef) -> Result<(), CraftError> {
    for (ident, needed) in required_parts(recipe) {
        let available = inventory.qty(ident);
        if available < needed {
            return Err(CraftError::MissingParts {
                ident,
                needed,
                available,
            });
        }
    }
    Ok(())
}

pub fn can_craft(inventory: &Inventory, recipe: &RecipeDef) -> bool {
    check_parts(inventory, recipe).is_ok()
}

impl World {
    /// Recipes available at `stations` that `entity` has the parts for
    pub fn craftable_recipes(&self, entity: Entity, stations: u32) -> Vec<i32> {
        let Some(inventory) = self.registry.inventory(entity) else {
            return Vec::new();
        };
        self.defs
            .recipes_for(stations)
            .into_iter()
            .filter(|r| can_craft(&inventory, r))
            .map(|r| r.ident)
            .collect()
    }

    /// Consume the parts of recipe `recipe` from `entity`'s inventory and
    /// add the product. The inventory is untouched on failure.
    pub fn craft(&mut self, entity: Entity, recipe: i32) -> Result<(), CraftError> {
        let recipe = self
            .defs
            .recipe(recipe)
            .ok_or(CraftError::UnknownRecipe(recipe))?;
        if self.defs.item(recipe.make_ident).is_none() {
            return Err(CraftError::UnknownItem(recipe.make_ident));
        }
        if let Some(part) = recipe.parts.iter().find(|p| self.defs.item(p.ident).is_none()) {
            return Err(CraftError::UnknownItem(part.ident));
        }
        let inventory = self
            .registry
            .inventory_mut(entity)
            .ok_or(CraftError::UnknownActor)?;
        check_parts(inventory, recipe)?;

        let mut updated = inventory.clone();
        for (ident, needed) in required_parts(recipe) {
            if !updated.remove(ident, needed) {
                return Err(CraftError::MissingParts {
                    ident,
                    needed,
                    available: updated.qty(ident),
                });
            }
        }
        updated.add(recipe.make_ident, recipe.make_qty);
        *inventory = updated;
        log::debug!(
            "{:?} crafted {} of item {} (recipe {})",
            entity,
            recipe.make_qty,
            recipe.make_ident,
            recipe.ident
        );
        Ok(())
    }
}
