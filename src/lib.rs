pub mod config;
pub mod deppath;
pub mod dict;
pub mod error;
pub mod features;
pub mod sentence;

pub use config::Config;
pub use deppath::{min_path_between_spans, path_between_tokens, DependencyEdge};
pub use dict::DictionaryStore;
pub use error::{FeatgenError, Result};
pub use features::{mention_features, relation_features};
pub use sentence::{Sentence, Span, Token};
