//! Scene stack: ordered layers over a fixed-size canvas, rendered once.

pub(crate) mod report;
pub(crate) mod stack;
