//! Domain types for trip packing
//!
//! - [`list`] - packing items, categories and provenance
//! - [`trip`] - a trip and its packing list
//! - [`clarify`] - clarification questions asked before generation
//! - [`id`] - opaque identifier minting and prefix resolution

pub mod clarify;
pub mod id;
pub mod list;
pub mod trip;

pub use clarify::{
    Answer, ClarificationAnswer, ClarificationQuestion, DETAILS_HEADER, QuestionKind, enhance_description,
};
pub use id::{IdKind, IdResolver, generate_id};
pub use list::{
    PackingCategory, PackingItem, PackingList, Provenance, RawCategory, RawItem, item_key, name_key, progress,
    simplify,
};
pub use trip::Trip;
