mod document;
mod provider_kind;
mod tag_set;

pub use document::Document;
pub use provider_kind::ProviderKind;
pub use tag_set::TagSet;
