//! Moving items between the cargo hold, a docked station's hangar, wrecks
//! and the fitting.
//!
//! Single-item transfers either complete or leave everything untouched.
//! Bulk transfers move items greedily in list order and stop at the first
//! one that would overflow the destination.

use thiserror::Error;
use tracing::debug;

use crate::game::constants::combat::LOOT_RANGE;
use crate::game::fitting::{FitError, SlotClass};
use crate::game::items::{self, Item};
use crate::game::state::{visible_to, EntityId, WorldState};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    #[error("not docked at a station")]
    NotDocked,
    #[error("no wreck {0} in reach")]
    UnknownWreck(EntityId),
    #[error("wreck out of range ({distance:.0} > {max:.0})")]
    OutOfRange { distance: f32, max: f32 },
    #[error("not enough cargo space: need {needed:.1}, {free:.1} free")]
    InsufficientCapacity { needed: f32, free: f32 },
    #[error("no item at index {0}")]
    InvalidIndex(usize),
    #[error("{0} cannot be fitted")]
    NotEquipment(&'static str),
    #[error(transparent)]
    Fit(#[from] FitError),
}

/// Where an unfitted item ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Station(usize),
    Cargo,
}

fn docked(world: &WorldState) -> Result<usize, TransferError> {
    world.docked_station().ok_or(TransferError::NotDocked)
}

/// Index of a wreck the player can reach
fn reachable_wreck(world: &WorldState, id: EntityId) -> Result<usize, TransferError> {
    let viewer = world.player.pocket_id();
    let sys = world.system();
    let index = sys
        .wrecks
        .iter()
        .position(|w| w.id == id && visible_to(w.pocket, viewer))
        .ok_or(TransferError::UnknownWreck(id))?;
    let distance = world.player.position.distance_to(sys.wrecks[index].position);
    if distance > LOOT_RANGE {
        return Err(TransferError::OutOfRange {
            distance,
            max: LOOT_RANGE,
        });
    }
    Ok(index)
}

fn check_room(world: &WorldState, item: &Item) -> Result<(), TransferError> {
    let capacity = world.player.stats.cargo_capacity;
    if items::has_room(&world.player.cargo, capacity, item.size) {
        Ok(())
    } else {
        Err(TransferError::InsufficientCapacity {
            needed: item.size,
            free: items::free_volume(&world.player.cargo, capacity),
        })
    }
}

/// Station hangar to cargo
pub fn load(world: &mut WorldState, index: usize) -> Result<(), TransferError> {
    let station = docked(world)?;
    let item = world.system().stations[station]
        .inventory
        .get(index)
        .ok_or(TransferError::InvalidIndex(index))?;
    check_room(world, item)?;
    let item = world.system_mut().stations[station].inventory.remove(index);
    world.player.cargo.push(item);
    Ok(())
}

/// Cargo to station hangar. Hangars have no volume limit.
pub fn unload(world: &mut WorldState, index: usize) -> Result<(), TransferError> {
    let station = docked(world)?;
    if index >= world.player.cargo.len() {
        return Err(TransferError::InvalidIndex(index));
    }
    let item = world.player.cargo.remove(index);
    world.system_mut().stations[station].inventory.push(item);
    Ok(())
}

/// Load hangar items into cargo until one does not fit. Returns the count moved.
pub fn load_all(world: &mut WorldState) -> Result<usize, TransferError> {
    let station = docked(world)?;
    let capacity = world.player.stats.cargo_capacity;
    let WorldState {
        systems,
        current,
        player,
        ..
    } = &mut *world;
    let inventory = &mut systems[*current].stations[station].inventory;

    let mut moved = 0;
    while let Some(item) = inventory.first() {
        if !items::has_room(&player.cargo, capacity, item.size) {
            break;
        }
        player.cargo.push(inventory.remove(0));
        moved += 1;
    }
    debug!(moved, "loaded cargo from station");
    Ok(moved)
}

/// Empty the cargo hold into the hangar
pub fn unload_all(world: &mut WorldState) -> Result<usize, TransferError> {
    let station = docked(world)?;
    let cargo = std::mem::take(&mut world.player.cargo);
    let moved = cargo.len();
    world.system_mut().stations[station].inventory.extend(cargo);
    debug!(moved, "unloaded cargo to station");
    Ok(moved)
}

/// Take one item from a wreck
pub fn loot(world: &mut WorldState, wreck: EntityId, index: usize) -> Result<(), TransferError> {
    let w = reachable_wreck(world, wreck)?;
    world.system_mut().wrecks[w].touch();
    let item = world.system().wrecks[w]
        .items
        .get(index)
        .ok_or(TransferError::InvalidIndex(index))?;
    check_room(world, item)?;
    let item = world.system_mut().wrecks[w].items.remove(index);
    world.player.cargo.push(item);
    Ok(())
}

/// Take wreck items in order until one does not fit. Returns the count moved.
pub fn loot_all(world: &mut WorldState, wreck: EntityId) -> Result<usize, TransferError> {
    let w = reachable_wreck(world, wreck)?;
    let capacity = world.player.stats.cargo_capacity;
    let WorldState {
        systems,
        current,
        player,
        ..
    } = &mut *world;
    let wreck = &mut systems[*current].wrecks[w];
    wreck.touch();

    let mut moved = 0;
    while let Some(item) = wreck.items.first() {
        if !items::has_room(&player.cargo, capacity, item.size) {
            break;
        }
        player.cargo.push(wreck.items.remove(0));
        moved += 1;
    }
    Ok(moved)
}

/// Drop one cargo item into a wreck
pub fn jettison(world: &mut WorldState, wreck: EntityId, index: usize) -> Result<(), TransferError> {
    let w = reachable_wreck(world, wreck)?;
    world.system_mut().wrecks[w].touch();
    if index >= world.player.cargo.len() {
        return Err(TransferError::InvalidIndex(index));
    }
    let item = world.player.cargo.remove(index);
    world.system_mut().wrecks[w].items.push(item);
    Ok(())
}

/// Fit an equipment item straight out of the cargo hold
pub fn fit_from_cargo(world: &mut WorldState, index: usize) -> Result<(), TransferError> {
    let equipment = world
        .player
        .cargo
        .get(index)
        .ok_or(TransferError::InvalidIndex(index))
        .and_then(|i| i.as_equipment().ok_or(TransferError::NotEquipment(i.name())))?;
    world.player.fit(equipment)?;
    world.player.cargo.remove(index);
    Ok(())
}

/// Fit an equipment item from the docked station's hangar
pub fn fit_from_station(world: &mut WorldState, index: usize) -> Result<(), TransferError> {
    let station = docked(world)?;
    let equipment = world.system().stations[station]
        .inventory
        .get(index)
        .ok_or(TransferError::InvalidIndex(index))
        .and_then(|i| i.as_equipment().ok_or(TransferError::NotEquipment(i.name())))?;
    world.player.fit(equipment)?;
    world.system_mut().stations[station].inventory.remove(index);
    Ok(())
}

/// Unfit a slot. The item goes to the hangar when docked, otherwise to cargo.
pub fn unfit_to_storage(
    world: &mut WorldState,
    class: SlotClass,
    index: usize,
) -> Result<Storage, TransferError> {
    if index >= world.player.fitting.slots(class).len() {
        return Err(FitError::InvalidSlot { class, index }.into());
    }
    match world.docked_station() {
        Some(station) => {
            let equipment = world.player.unfit(class, index)?;
            world.system_mut().stations[station]
                .inventory
                .push(Item::equipment(equipment));
            Ok(Storage::Station(station))
        }
        None => {
            let equipment = world.player.fitting.slots(class)[index].equipment;
            check_room(world, &Item::equipment(equipment))?;
            let equipment = world.player.unfit(class, index)?;
            world.player.cargo.push(Item::equipment(equipment));
            Ok(Storage::Cargo)
        }
    }
}
