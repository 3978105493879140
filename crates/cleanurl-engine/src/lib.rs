//! Clean url engine
//!
//! - [`PathBuilder`]: resource to clean url
//! - [`PathMatcher`]: clean url to resource type and identifier chain
//! - [`CleanRouter`]: matcher plus resolver, as the host router sees it

pub mod builder;
pub mod matcher;
pub mod router;

pub use builder::{BuildOptions, PathBuilder, build_path};
pub use matcher::{MatchedPattern, MatchedRoute, NoMatch, PathMatcher};
pub use router::{CleanRouter, RouteParams};
