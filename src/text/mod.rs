pub(crate) mod fit;
pub(crate) mod metrics;
pub(crate) mod parley_font;
