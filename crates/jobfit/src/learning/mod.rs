pub mod evidence;
pub mod insights;
pub mod mining;
pub mod retrain;
pub mod suggest;

pub use insights::{keyword_insights, Insights, KeywordInsight};
pub use retrain::{retrain, RetrainConfig, RetrainPlan, WeightUpdate};
pub use suggest::{suggest_from_application, suggest_from_dismissal};
