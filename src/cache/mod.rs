pub mod reader;
pub mod tables;

pub use reader::{
    load_category_lookup, load_video_cache, parse_category_lookup, parse_video_cache,
    read_category_lookup, read_video_cache,
};
pub use tables::{CountryBundle, VideoCache};
