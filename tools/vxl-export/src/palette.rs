//! Palette construction for converted models.
//!
//! The format allows 255 usable color slots (index 0 stays free), of
//! which 16..=31 are reserved for the in-game team remap and must never
//! be handed out to ordinary colors. The builder assigns slots greedily
//! in first-seen order; once every free slot is taken, new colors fall
//! back to the perceptually nearest already-assigned slot.

use hashbrown::HashMap;
use vxl_common::formats::vxl::{DEFAULT_REMAP_END, DEFAULT_REMAP_START};
use vxl_common::Palette;

/// Luma weights for nearest-color matching (r, g, b). Green dominates
/// perceived brightness, so a green miss costs the most.
const WEIGHT_R: i64 = 30;
const WEIGHT_G: i64 = 59;
const WEIGHT_B: i64 = 11;

/// Incrementally assigns palette slots to source colors.
pub struct PaletteBuilder {
    colors: [[u8; 3]; 256],
    /// Slots in assignment order; ties in nearest-match go to the
    /// earliest entry.
    assigned: Vec<u8>,
    lookup: HashMap<[u8; 3], u8>,
    cursor: u16,
    remap_start: u8,
    remap_end: u8,
}

impl PaletteBuilder {
    pub fn new() -> Self {
        let mut colors = [[0u8; 3]; 256];
        // Red ramp in the remap range, the conventional team-color
        // placeholder; the game substitutes the player color at runtime.
        for i in DEFAULT_REMAP_START..=DEFAULT_REMAP_END {
            let step = i - DEFAULT_REMAP_START;
            let v = 255 - step * 12;
            colors[i as usize] = [v, 0, 0];
        }
        Self {
            colors,
            assigned: Vec::new(),
            lookup: HashMap::new(),
            cursor: 1,
            remap_start: DEFAULT_REMAP_START,
            remap_end: DEFAULT_REMAP_END,
        }
    }

    fn in_remap_range(&self, slot: u8) -> bool {
        slot >= self.remap_start && slot <= self.remap_end
    }

    fn next_free_slot(&mut self) -> Option<u8> {
        while self.cursor <= 255 {
            let slot = self.cursor as u8;
            self.cursor += 1;
            if !self.in_remap_range(slot) {
                return Some(slot);
            }
        }
        None
    }

    /// Slot for a color, assigning a new one if any remain.
    pub fn index_for(&mut self, rgb: [u8; 3]) -> u8 {
        if let Some(&slot) = self.lookup.get(&rgb) {
            return slot;
        }
        if let Some(slot) = self.next_free_slot() {
            self.colors[slot as usize] = rgb;
            self.assigned.push(slot);
            self.lookup.insert(rgb, slot);
            return slot;
        }
        self.resolve(rgb)
    }

    /// Slot for a color without assigning anything: an exact hit, or the
    /// nearest assigned slot by weighted RGB distance. Usable once the
    /// full color set has been fed through [`PaletteBuilder::index_for`].
    pub fn resolve(&self, rgb: [u8; 3]) -> u8 {
        if let Some(&slot) = self.lookup.get(&rgb) {
            return slot;
        }
        let mut best_slot = 0u8;
        let mut best_dist = i64::MAX;
        for &slot in &self.assigned {
            let d = weighted_distance(rgb, self.colors[slot as usize]);
            // Strict less keeps the first-assigned slot on ties.
            if d < best_dist {
                best_dist = d;
                best_slot = slot;
            }
        }
        best_slot
    }

    /// Remap slot for a team-tagged color, chosen by brightness so darker
    /// source colors land on the darker end of the team ramp.
    pub fn team_index(&self, rgb: [u8; 3]) -> u8 {
        let luma =
            (WEIGHT_R * rgb[0] as i64 + WEIGHT_G * rgb[1] as i64 + WEIGHT_B * rgb[2] as i64) / 100;
        let range = (self.remap_end - self.remap_start) as i64;
        // Bright colors map near remap_start, where the ramp is brightest.
        self.remap_start + ((255 - luma.clamp(0, 255)) * range / 255) as u8
    }

    pub fn finish(self) -> Palette {
        Palette(self.colors)
    }
}

impl Default for PaletteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn weighted_distance(a: [u8; 3], b: [u8; 3]) -> i64 {
    let dr = a[0] as i64 - b[0] as i64;
    let dg = a[1] as i64 - b[1] as i64;
    let db = a[2] as i64 - b[2] as i64;
    WEIGHT_R * dr * dr + WEIGHT_G * dg * dg + WEIGHT_B * db * db
}
