/// Cell is known to be free.
pub const COST_FREE: u8 = 0;
/// Cell is within the robot's inscribed radius of an obstacle.
pub const COST_INSCRIBED: u8 = 253;
/// Cell is certainly occupied.
pub const COST_LETHAL: u8 = 254;
/// No information about the cell (NO_INFORMATION).
pub const COST_UNKNOWN: u8 = 255;

pub const DEFAULT_OCCUPIED_THRESH: f32 = 0.65;
pub const DEFAULT_FREE_THRESH: f32 = 0.196;
