pub mod assessment;
pub mod contract;
pub mod fairness;
