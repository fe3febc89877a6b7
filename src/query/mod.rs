//! Query handling for Deepsift
//!
//! Every page the crawler touches is identified by a [`SearchRequest`]: the
//! single request line sent to the endpoint. User input, literal page paths and
//! pagination hrefs all pass through [`QueryBuilder::build`], so two
//! representations of the same page always compare equal.

mod builder;
mod request;

pub use builder::QueryBuilder;
pub use request::SearchRequest;
