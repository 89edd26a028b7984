pub mod analyses;
pub mod recommendation;
pub mod token;
