//! JSON scene descriptions and building them into a ready [`crate::Scene`].

pub(crate) mod build;
pub(crate) mod model;
