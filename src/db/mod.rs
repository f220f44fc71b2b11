mod baselines;
mod risk_alerts;
mod samples;
mod zones;

pub use baselines::BaselineRepo;
pub use risk_alerts::RiskAlertRepo;
pub use samples::SampleRepo;
pub use zones::ZoneRepo;
