//! Core pipeline for the forest cover type demo.
//!
//! Predicts the forest cover type of a 30m×30m land patch from ten
//! cartographic measurements plus two categorical designations
//! (wilderness area, soil type), using a pre-trained decision forest
//! loaded once at startup.
//!
//! Pipeline per submission:
//!   categorical encoding → feature assembly → forest prediction → label mapping.
//!
//! Every submission is stateless and touches no mutable shared state;
//! the loaded model is read-only for the life of the process.

pub mod categorical;
pub mod cover_type;
pub mod error;
pub mod forest;
pub mod measurements;
pub mod predictor;
pub mod schema;
