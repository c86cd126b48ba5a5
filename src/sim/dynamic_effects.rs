//! One-shot pickups from the dynamic layer: keys, potions, coins
//!
//! The tile under the player is consumed on first contact whatever it does.

use super::events::GameEvent;
use super::player::Player;
use super::tiles::TileLayer;

/// What a consumed dynamic tile did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickup {
    pub tile: u16,
    /// Lock group opened and the number of tiles in it
    pub opened: Option<(String, usize)>,
    pub healed: Option<i32>,
    pub paid: Option<i32>,
}

impl Pickup {
    /// Lock notification for observers, if the pickup was a key
    pub fn lock_event(&self) -> Option<GameEvent> {
        self.opened.as_ref().map(|(name, tiles)| GameEvent::LockOpened {
            name: name.clone(),
            tiles: *tiles,
        })
    }
}

/// Consume the dynamic tile at the player's position, if any
pub fn resolve(player: &mut Player, dynamic: &mut TileLayer) -> Option<Pickup> {
    let pos = player.body.pos;
    // Snapshot first; the layer is only mutated once all properties are read
    let tile = dynamic.tile_at_world(pos)?;
    let index = tile.index;
    let props = tile.props.clone();

    let opened = props.opens.map(|name| {
        let tiles = dynamic.open_group(&name);
        log::info!("Lock '{name}' opened ({tiles} tiles)");
        (name, tiles)
    });
    if let Some(heals) = props.heals {
        player.change_health(heals);
    }
    if let Some(pays) = props.pays {
        player.change_score(pays);
    }
    dynamic.remove_tile_at_world(pos);

    Some(Pickup {
        tile: index,
        opened,
        healed: props.heals,
        paid: props.pays,
    })
}
