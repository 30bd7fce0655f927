mod artifact_path;
mod local_artifact_store;

pub use artifact_path::build_artifact_path;
pub use local_artifact_store::LocalArtifactStore;
