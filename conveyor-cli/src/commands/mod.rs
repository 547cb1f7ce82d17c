pub mod abort_build;
pub mod checklist;
pub mod get_pipeline;
pub mod pause;
pub mod set_pipeline;
pub mod targets;
