//! Tile layers and spatial queries
//!
//! A layer is a fixed grid of optional tiles. The static `World` layer never
//! changes during a level; the `Dynamic` layer loses tiles as they are
//! consumed and may have collision switched off (opened locks).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;

/// Effect properties authored on a tile
///
/// Every field is optional; absence means the documented default
/// (gravity 1, no heal, no lock, not a ladder or liquid).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TileProps {
    pub collides: bool,
    pub gravity: Option<f32>,
    pub heals: Option<i32>,
    pub pays: Option<i32>,
    pub opens: Option<String>,
    pub is_ladder: Option<bool>,
    pub is_liquid: Option<bool>,
    pub name: Option<String>,
    pub monster: Option<String>,
}

impl TileProps {
    pub fn is_ladder(&self) -> bool {
        self.is_ladder.unwrap_or(false)
    }

    pub fn is_liquid(&self) -> bool {
        self.is_liquid.unwrap_or(false)
    }
}

/// A single placed tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Spritesheet frame
    pub index: u16,
    /// Current collision flag (initialised from `props.collides`)
    pub collides: bool,
    /// Render opacity
    #[serde(default = "full_alpha")]
    pub alpha: f32,
    #[serde(default)]
    pub props: TileProps,
}

fn full_alpha() -> f32 {
    1.0
}

impl Tile {
    pub fn new(index: u16, props: TileProps) -> Self {
        Self {
            index,
            collides: props.collides,
            alpha: 1.0,
            props,
        }
    }

    /// Plain colliding tile without effects
    pub fn solid(index: u16) -> Self {
        Self::new(
            index,
            TileProps {
                collides: true,
                ..Default::default()
            },
        )
    }

    /// Plain decorative tile without collision or effects
    pub fn decor(index: u16) -> Self {
        Self::new(index, TileProps::default())
    }

    pub fn set_collision(&mut self, collides: bool) {
        self.collides = collides;
    }
}

/// A rectangular grid of optional tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    /// Width in tiles
    pub width: usize,
    /// Height in tiles
    pub height: usize,
    /// Row-major, `width * height` cells
    tiles: Vec<Option<Tile>>,
}

impl TileLayer {
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles: vec![None; width * height],
        }
    }

    /// Build a layer from text rows, one character per tile
    ///
    /// `legend` maps a character to a tile; unmapped characters stay empty.
    /// Short rows are padded with empty cells.
    pub fn from_ascii<F>(name: impl Into<String>, rows: &[&str], legend: F) -> Self
    where
        F: Fn(char) -> Option<Tile>,
    {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut layer = Self::new(name, width, rows.len());
        for (ty, row) in rows.iter().enumerate() {
            for (tx, c) in row.chars().enumerate() {
                if let Some(tile) = legend(c) {
                    layer.put(tx, ty, tile);
                }
            }
        }
        layer
    }

    /// Whether the backing storage matches the declared dimensions
    pub fn is_well_formed(&self) -> bool {
        self.tiles.len() == self.width * self.height
    }

    pub fn width_px(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn height_px(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    fn cell(&self, tx: usize, ty: usize) -> Option<usize> {
        (tx < self.width && ty < self.height).then_some(ty * self.width + tx)
    }

    /// Grid cell containing a world position
    pub fn world_to_tile(&self, pos: Vec2) -> Option<(usize, usize)> {
        let tx = (pos.x / TILE_SIZE).floor();
        let ty = (pos.y / TILE_SIZE).floor();
        if tx < 0.0 || ty < 0.0 || !tx.is_finite() || !ty.is_finite() {
            return None;
        }
        let (tx, ty) = (tx as usize, ty as usize);
        self.cell(tx, ty).map(|_| (tx, ty))
    }

    /// Centre of a grid cell in world coordinates
    pub fn tile_center(tx: usize, ty: usize) -> Vec2 {
        Vec2::new(
            (tx as f32 + 0.5) * TILE_SIZE,
            (ty as f32 + 0.5) * TILE_SIZE,
        )
    }

    pub fn put(&mut self, tx: usize, ty: usize, tile: Tile) {
        if let Some(i) = self.cell(tx, ty) {
            self.tiles[i] = Some(tile);
        }
    }

    pub fn tile_at(&self, tx: usize, ty: usize) -> Option<&Tile> {
        self.cell(tx, ty).and_then(|i| self.tiles.get(i)?.as_ref())
    }

    pub fn tile_at_world(&self, pos: Vec2) -> Option<&Tile> {
        let (tx, ty) = self.world_to_tile(pos)?;
        self.tile_at(tx, ty)
    }

    /// Remove and return the tile at a world position
    pub fn remove_tile_at_world(&mut self, pos: Vec2) -> Option<Tile> {
        let (tx, ty) = self.world_to_tile(pos)?;
        self.remove_tile_at(tx, ty)
    }

    pub fn remove_tile_at(&mut self, tx: usize, ty: usize) -> Option<Tile> {
        let i = self.cell(tx, ty)?;
        self.tiles.get_mut(i)?.take()
    }

    /// Whether a colliding tile sits at a world position
    pub fn is_solid_at(&self, pos: Vec2) -> bool {
        self.tile_at_world(pos).is_some_and(|t| t.collides)
    }

    /// Grid positions of every tile matching `predicate`, row-major
    pub fn positions_where<P>(&self, predicate: P) -> Vec<(usize, usize)>
    where
        P: Fn(&Tile) -> bool,
    {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(i, t)| {
                t.as_ref()
                    .filter(|t| predicate(t))
                    .map(|_| (i % self.width, i / self.width))
            })
            .collect()
    }

    /// Switch collision and opacity of every tile whose `name` matches
    ///
    /// Returns the number of tiles in the group.
    pub fn open_group(&mut self, name: &str) -> usize {
        let mut count = 0;
        for tile in self.tiles.iter_mut().flatten() {
            if tile.props.name.as_deref() == Some(name) {
                tile.set_collision(false);
                tile.alpha = 0.5;
                count += 1;
            }
        }
        count
    }

    /// Tiles whose cell rectangle intersects the segment `a`–`b`
    pub fn tiles_along(&self, a: Vec2, b: Vec2) -> impl Iterator<Item = &Tile> + '_ {
        let min = a.min(b);
        let max = a.max(b);
        let tx0 = ((min.x / TILE_SIZE).floor().max(0.0)) as usize;
        let ty0 = ((min.y / TILE_SIZE).floor().max(0.0)) as usize;
        let tx1 = ((max.x / TILE_SIZE).floor().max(0.0) as usize).min(self.width.saturating_sub(1));
        let ty1 = ((max.y / TILE_SIZE).floor().max(0.0) as usize).min(self.height.saturating_sub(1));
        let empty = self.width == 0 || self.height == 0 || max.x < 0.0 || max.y < 0.0;

        (ty0..=ty1)
            .flat_map(move |ty| (tx0..=tx1).map(move |tx| (tx, ty)))
            .filter(move |_| !empty)
            .filter(move |&(tx, ty)| {
                let cell_min = Vec2::new(tx as f32, ty as f32) * TILE_SIZE;
                segment_hits_rect(a, b, cell_min, cell_min + Vec2::splat(TILE_SIZE))
            })
            .filter_map(move |(tx, ty)| self.tile_at(tx, ty))
    }

    /// Whether any colliding tile intersects the segment `a`–`b`
    pub fn blocks_segment(&self, a: Vec2, b: Vec2) -> bool {
        self.tiles_along(a, b).any(|t| t.collides)
    }
}

/// Liang-Barsky clip of a segment against an axis-aligned rectangle
fn segment_hits_rect(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> bool {
    let d = b - a;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    let checks = [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return false;
            }
        }
    }
    true
}
