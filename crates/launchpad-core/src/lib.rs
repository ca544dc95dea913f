//! Launchpad Core Library
//!
//! Pre-deploy validation and git publishing for web API projects.
//! Frontends hand in a [`config::DeployConfig`], a [`exec::CommandRunner`]
//! and a push gate; everything else happens here without terminal I/O.

pub mod config;
pub mod deploy;
pub mod exec;
pub mod git;
pub mod project;
pub mod report;
pub mod validate;
pub mod workflow;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{
        ConfigSource, DeployConfig, DeploySettings, RemoteConfig, ValidationConfig,
    };

    // Command execution
    pub use crate::exec::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};

    // Reports
    pub use crate::deploy::{DeployStep, StepReport, StepStatus};
    pub use crate::deploy::push::{PushOutcome, PushReport, PushState};
    pub use crate::report::{Finding, FindingLevel};
    pub use crate::validate::{CheckCategory, CheckReport, ValidationReport};

    // Workflow
    pub use crate::workflow::{
        NoopObserver, Phase, PushGate, Workflow, WorkflowObserver, WorkflowOptions,
        WorkflowOutcome, WorkflowReport,
    };
}
