// src/core/mod.rs
//
// The request-scoped core computations. The pure functions in `scoring` and
// `feed` operate on already-fetched rows; the service functions compose them
// with an injected store handle so nothing here owns a connection.

pub mod feed;
pub mod interaction;
pub mod profile;
pub mod scoring;
