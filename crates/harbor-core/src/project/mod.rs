pub mod model;
pub mod repository;

pub use model::{Project, ProjectOrigin, project_id_for_path};
pub use repository::{ProjectDiscovery, ProjectRegistry};
