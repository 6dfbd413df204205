pub mod model;
pub mod subst;
pub mod volume;
