pub mod builders;
pub mod classifier;
pub mod services;
pub mod sources;
