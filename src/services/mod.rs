pub mod answer_recorder;
pub mod demo_seed;
