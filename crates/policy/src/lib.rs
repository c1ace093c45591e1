pub mod danger;
pub mod personality;
pub mod profile;

pub use danger::{DangerScanner, DecisionPolicy};
pub use personality::{PersonalityTraits, PersonalityUpdate};
pub use profile::{AgentProfile, PolicyError};
