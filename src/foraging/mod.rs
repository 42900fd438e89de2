//! How much a herbivore wants and is able to eat.

mod demands;
mod limits;

pub use demands::ForageDemandSolver;
pub use limits::{
    digestive_limit_illius_gordon_1992, max_intake_as_total_mass, DietComposer, DigestiveLimit,
    ForagingLimit, HalfMaxIntake,
};
