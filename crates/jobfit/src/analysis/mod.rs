pub mod jd_analyzer;
pub mod lexicon;
pub mod resume;

pub use jd_analyzer::{analyze, apply, AppliedAnalysis, JdAnalysis};
pub use lexicon::{SkillLexicon, StaticLexicon};
pub use resume::{apply_resume_keywords, extract_resume_keywords};
