pub(crate) mod grid;
pub(crate) mod highlights;
pub(crate) mod indicators;
pub(crate) mod palette;
pub(crate) mod pieces;
pub(crate) mod pipeline;
pub(crate) mod target;
