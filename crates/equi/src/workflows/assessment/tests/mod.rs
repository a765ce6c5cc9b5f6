mod common;
mod scoring;
mod simulator;
