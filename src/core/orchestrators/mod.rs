pub mod app_orchestrator;
mod capture_session;
mod identification_workflow;
