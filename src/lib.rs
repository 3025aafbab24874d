pub mod analysis;
pub mod collector;
pub mod config;
pub mod extract;
pub mod language;
pub mod models;
pub mod report;
pub mod server;

pub use analysis::{analyze, Analysis, AnalysisError};
pub use collector::{collect_comments, Collection, CommentSource};
pub use config::{AnalysisOptions, ClientOptions, Config, SortOrder};
pub use extract::{YoutubeError, YoutubeExtractor};
pub use language::{classify_comments, DetectError, LanguageDetector, WhatlangDetector};
pub use models::{CommentRecord, LanguageLabel};
pub use report::{LanguageTally, Report, ReportError, ReportRow};
