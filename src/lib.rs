pub mod classifier;
pub mod config;
pub mod message;
pub mod policy;

pub use classifier::Classifier;
pub use config::{HeaderCheck, HeaderRule, PatternRule, RuleSet, DEFAULT_THRESHOLD};
pub use message::{EmailRecord, Folder, MessageState, ScoreContribution, Verdict};
pub use policy::{apply_verdict, Disposition, MessageStore, FALSE_POSITIVE_LABEL};
