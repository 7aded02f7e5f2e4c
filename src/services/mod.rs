pub mod executor;
pub mod profile;

pub use executor::{ExecutorService, PreparedCommand};
pub use profile::{BinarySummary, ProfileService, ProfileSummary};
