//! Rooms and their per-turn checksum.

use crate::checksum::{Checksum, ChecksumFold};

/// The checksummed state of one room slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Room {
    /// Slot in the room table.
    pub index: u16,
    /// Whether the slot holds a live room.
    pub exists: bool,
    /// Number of slabs the room covers.
    pub slabs_count: u32,
    /// Central subtile, x.
    pub central_stl_x: u16,
    /// Central subtile, y.
    pub central_stl_y: u16,
    /// Efficiency rating.
    pub efficiency: u16,
    /// Capacity currently in use.
    pub used_capacity: u32,
}

impl Room {
    /// Polynomial fold of slab count, centre, efficiency, used capacity
    /// and index, in that order.
    pub fn checksum(&self) -> Checksum {
        ChecksumFold::new()
            .add(self.slabs_count)
            .add(self.central_stl_x as u32)
            .add(self.central_stl_y as u32)
            .add(self.efficiency as u32)
            .add(self.used_capacity)
            .add(self.index as u32)
            .finish()
    }
}
