//! Station market, repair service and ship hangar. Everything here needs the
//! player docked; purchases land in the station's hangar inventory.

use thiserror::Error;
use tracing::info;

use crate::game::catalog::ores::OreKind;
use crate::game::catalog::{self, ships};
use crate::game::constants::market;
use crate::game::items::{self, Item, ItemKind};
use crate::game::state::{Ship, WorldState};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    #[error("not docked at a station")]
    NotDocked,
    #[error("'{0}' is not sold here")]
    UnknownItem(String),
    #[error("unknown ship '{0}'")]
    UnknownShip(String),
    #[error("insufficient credits: need {price}, have {available}")]
    InsufficientCredits { price: u64, available: u64 },
    #[error("no item at index {0}")]
    InvalidIndex(usize),
    #[error("already own a {0}")]
    AlreadyOwned(&'static str),
    #[error("{0} is not in the hangar")]
    NotOwned(String),
    #[error("already flying a {0}")]
    AlreadyFlying(&'static str),
    #[error("quantity must be at least one")]
    ZeroQuantity,
}

fn docked(world: &WorldState) -> Result<usize, MarketError> {
    world.docked_station().ok_or(MarketError::NotDocked)
}

fn charge(world: &mut WorldState, price: u64) -> Result<(), MarketError> {
    if world.player.credits < price {
        return Err(MarketError::InsufficientCredits {
            price,
            available: world.player.credits,
        });
    }
    world.player.credits -= price;
    Ok(())
}

fn ratio(price: u64, ratio: f64) -> u64 {
    (price as f64 * ratio).round() as u64
}

/// What the station pays for one unit of `item`
pub fn sell_price(item: &Item) -> u64 {
    let base = item.base_price();
    match item.kind {
        ItemKind::Ore(_) => ratio(base, market::ORE_SELL_RATIO),
        ItemKind::Metal(_) => ratio(base, market::METAL_SELL_RATIO),
        ItemKind::Equipment(_) => ratio(base, market::EQUIPMENT_SELL_RATIO),
        ItemKind::Loot(_) => base,
    }
}

/// Resolve a market listing: any ore or any catalog weapon/module
fn listing(name: &str) -> Option<Item> {
    if let Some(ore) = OreKind::from_name(name) {
        return Some(Item::ore(ore));
    }
    catalog::lookup(name).map(Item::equipment)
}

/// Buy `quantity` units at catalog price. Returns the credits spent.
pub fn buy(world: &mut WorldState, name: &str, quantity: u32) -> Result<u64, MarketError> {
    let station = docked(world)?;
    if quantity == 0 {
        return Err(MarketError::ZeroQuantity);
    }
    let item = listing(name).ok_or_else(|| MarketError::UnknownItem(name.to_string()))?;
    let price = item.base_price().saturating_mul(u64::from(quantity));
    charge(world, price)?;

    let inventory = &mut world.system_mut().stations[station].inventory;
    inventory.extend(std::iter::repeat(item).take(quantity as usize));
    info!(item = name, quantity, price, "market purchase");
    Ok(price)
}

/// Sell one item from the hangar. Returns the credits earned.
pub fn sell(world: &mut WorldState, index: usize) -> Result<u64, MarketError> {
    let station = docked(world)?;
    let inventory = &mut world.system_mut().stations[station].inventory;
    if index >= inventory.len() {
        return Err(MarketError::InvalidIndex(index));
    }
    let item = inventory.remove(index);
    let earned = sell_price(&item);
    world.player.credits = world.player.credits.saturating_add(earned);
    Ok(earned)
}

fn sell_where(world: &mut WorldState, keep: impl Fn(&Item) -> bool) -> Result<u64, MarketError> {
    let station = docked(world)?;
    let inventory = &mut world.system_mut().stations[station].inventory;
    let mut earned = 0u64;
    inventory.retain(|item| {
        if keep(item) {
            true
        } else {
            earned = earned.saturating_add(sell_price(item));
            false
        }
    });
    world.player.credits = world.player.credits.saturating_add(earned);
    Ok(earned)
}

/// Sell every ore unit in the hangar
pub fn sell_all_ore(world: &mut WorldState) -> Result<u64, MarketError> {
    let earned = sell_where(world, |i| !i.is_ore())?;
    info!(earned, "sold all ore");
    Ok(earned)
}

/// Sell every unit of metal scrap in the hangar
pub fn sell_all_metal(world: &mut WorldState) -> Result<u64, MarketError> {
    let earned = sell_where(world, |i| !i.is_metal())?;
    info!(earned, "sold all metal scrap");
    Ok(earned)
}

/// Credits to restore every pool of `ship` to full
pub fn repair_cost(ship: &Ship) -> u64 {
    let missing = (ship.stats.max_shield - ship.defense.shield).max(0.0)
        + (ship.stats.max_armor - ship.defense.armor).max(0.0)
        + (ship.stats.max_hull - ship.defense.hull).max(0.0);
    (f64::from(missing) * market::REPAIR_COST_PER_POINT).round() as u64
}

/// Restore shield, armor and hull. Returns the credits spent.
pub fn repair(world: &mut WorldState) -> Result<u64, MarketError> {
    docked(world)?;
    let cost = repair_cost(&world.player);
    if cost == 0 {
        return Ok(0);
    }
    charge(world, cost)?;
    let ship = &mut world.player;
    ship.defense.shield = ship.stats.max_shield;
    ship.defense.armor = ship.stats.max_armor;
    ship.defense.hull = ship.stats.max_hull;
    info!(cost, "ship repaired");
    Ok(cost)
}

/// Buy a hull into the hangar
pub fn buy_ship(world: &mut WorldState, name: &str) -> Result<u64, MarketError> {
    docked(world)?;
    let template = ships::find(name).ok_or_else(|| MarketError::UnknownShip(name.to_string()))?;
    if world.hangar.iter().any(|t| t.name == template.name) {
        return Err(MarketError::AlreadyOwned(template.name));
    }
    charge(world, template.price)?;
    world.hangar.push(template);
    info!(ship = template.name, price = template.price, "ship purchased");
    Ok(template.price)
}

/// Board another owned hull. Fitted items go to the hangar; credits and
/// cargo carry over, with cargo trimmed from the end into the hangar if the
/// new hold is smaller.
pub fn switch_ship(world: &mut WorldState, name: &str) -> Result<(), MarketError> {
    let station = docked(world)?;
    let template = world
        .hangar
        .iter()
        .copied()
        .find(|t| t.name == name)
        .ok_or_else(|| MarketError::NotOwned(name.to_string()))?;
    if world.player.template.name == template.name {
        return Err(MarketError::AlreadyFlying(template.name));
    }

    let unfitted = world.player.fitting.drain();
    let position = world.player.position;
    let old = std::mem::replace(&mut world.player, Ship::new(template, position));
    let ship = &mut world.player;
    ship.heading = old.heading;
    ship.credits = old.credits;
    ship.cargo = old.cargo;
    let overflow = items::trim_to_capacity(&mut ship.cargo, ship.stats.cargo_capacity);

    let inventory = &mut world.system_mut().stations[station].inventory;
    inventory.extend(unfitted.into_iter().map(Item::equipment));
    inventory.extend(overflow.into_iter().rev());

    world.clear_selection();
    world.auto_fire = false;
    world.auto_mine = false;
    info!(from = old.template.name, to = template.name, "switched ship");
    Ok(())
}
