pub mod area;
pub mod entity;
pub mod placement;
pub mod rules;
