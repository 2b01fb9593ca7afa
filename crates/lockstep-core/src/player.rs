//! Player slots: the viewpoint and intent state lockstep must also match.

use crate::checksum::{Checksum, ChecksumFold};
use crate::id::PlayerId;

/// Who drives a player slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Controller {
    /// A human sending input packets.
    #[default]
    Human,
    /// The built-in AI. Its camera is never synchronized.
    Computer,
}

/// Camera position of a human player, in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Camera {
    /// East-west coordinate.
    pub x: i32,
    /// North-south coordinate.
    pub y: i32,
    /// Height.
    pub z: i32,
}

/// The checksummed state of an existing player slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Player {
    /// Slot of this player.
    pub id: PlayerId,
    /// Human or computer control.
    pub controller: Controller,
    /// Active camera, if one is attached.
    pub camera: Option<Camera>,
    /// Turns left in the player's current instance (possession, spell).
    pub instance_remain_turns: u32,
    /// The player's current instance.
    pub instance_num: u8,
}

impl Player {
    /// Whether the built-in AI drives this slot.
    pub fn is_computer_controlled(&self) -> bool {
        self.controller == Controller::Computer
    }

    /// Per-player checksum.
    ///
    /// Zero for computer-controlled players and players without a camera.
    /// Only viewpoint and instance playback are folded; simulation state
    /// owned by the player is already covered by thing and room sums.
    pub fn checksum(&self) -> Checksum {
        if self.is_computer_controlled() {
            return 0;
        }
        let Some(camera) = self.camera else {
            return 0;
        };
        ChecksumFold::new()
            .add(self.instance_remain_turns)
            .add(self.instance_num as u32)
            .add(camera.x as u32)
            .add(camera.y as u32)
            .add(camera.z as u32)
            .finish()
    }
}
