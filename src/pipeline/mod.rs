// Pipeline

pub mod aggregator;
pub mod classifier;
pub mod dispatcher;
pub mod gate;
