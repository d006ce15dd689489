pub mod cleanup;
pub mod navigation;
pub mod organize;
pub mod pipeline;

pub use cleanup::{CleanupOutcome, CleanupPlanner, CleanupRequest, ExpiredScan, UnusedDetection};
pub use navigation::{CommandSuggestion, DirectoryAlias, NavigationPlan, NavigationPlanner};
pub use organize::{
    OrganizeOutcome, OrganizePlanner, OrganizeRequest, GENERAL_RECOMMENDATIONS,
    SLOW_STARTUP_RECOMMENDATION,
};
pub use pipeline::{Pipeline, StepReport, StepStatus};
