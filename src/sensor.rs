mod classifier;
mod danger_level;
mod hazard_level;
mod movement_status;
mod reading;

pub use classifier::*;
pub use danger_level::*;
pub use hazard_level::*;
pub use movement_status::*;
pub use reading::*;
