pub(crate) mod geometry;
pub(crate) mod planner;
