pub mod envfile;
pub mod fs_repository;
pub mod memory;
pub mod model;
pub mod repository;

pub use fs_repository::FileProfileRepository;
pub use memory::MemoryProfileRepository;
pub use model::Profile;
pub use repository::ProfileRepository;
