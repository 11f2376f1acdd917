mod profile;

pub use profile::{Profile, Role};
