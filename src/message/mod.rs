//! # Message Module
//!
//! Value objects that flow through a dispatch: the immutable [`RequestView`] snapshot a
//! handler receives and the [`Response`] it returns.
//!
//! Raw transport parsing is not done here. Whatever accepts connections builds a
//! `RequestView` from already-parsed parts and writes the `Response` back out.
//!
//! Small collections (headers, query and path parameters) use `SmallVec` so that the
//! common case never touches the heap for the collection itself.

mod request;
mod response;

use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of path/query parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Name/value pairs for path and query parameters.
///
/// Names are `Arc<str>` because path parameter names come from the static route table
/// and are cloned on every match; values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Name/value pairs for headers.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

pub use request::RequestView;
pub use response::Response;

/// Last occurrence of `name` wins, matching how duplicate query keys and
/// duplicate path placeholders are resolved.
pub(crate) fn last_value<'a>(pairs: &'a [(Arc<str>, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rfind(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| v.as_str())
}
