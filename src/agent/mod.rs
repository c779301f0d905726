//! Agent identities and profiles
//!
//! Owns the one-profile-per-identity invariant. A profile is created once by
//! registration and afterwards only mutated by task completion, decay, and
//! vouches targeting it.

pub mod profile;
pub mod registry;

pub use profile::AgentProfile;
pub use registry::{load_profile, register_agent, save_profile};
