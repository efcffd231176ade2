//! Mapper and template parsing.
//!
//! `mapper` reads the XML structure; `placeholder` splits every text run into
//! literal text and `#{}` / `${}` parameters.

mod mapper;
mod placeholder;


pub use mapper::{parse_fragment, parse_mapper, parse_template};
pub use placeholder::scan as scan_placeholders;
