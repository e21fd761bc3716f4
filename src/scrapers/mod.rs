//! Network-facing article access.
//!
//! # Submodules
//!
//! | Module | Role | Method |
//! |--------|------|--------|
//! | [`newsapi`] | Finds articles for a topic | NewsAPI `everything` search, or a local JSON file |
//! | [`article`] | Turns one article URL into plain text | HTML scraping with an ordered selector chain |
//!
//! Both log and type their failures. The source fails the run when it cannot
//! deliver articles; the extractor never does, an empty string means
//! "extraction unavailable".

pub mod article;
pub mod newsapi;
