//! Track catalog: the ordered, read-only list of playable tracks.
//!
//! A catalog comes either from a JSON file (`[{title, artist, cover, audio,
//! length}]`) or from scanning a music directory. Once built it never changes;
//! the player only reads from it.

mod length;
mod load;
mod model;
mod scan;

pub use length::{format_clock, parse_length};
pub use load::load_json;
pub use model::{Catalog, TrackDescriptor};
pub use scan::scan;
