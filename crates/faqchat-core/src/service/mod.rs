//! Domain services built on the repository traits.

pub mod faq;
