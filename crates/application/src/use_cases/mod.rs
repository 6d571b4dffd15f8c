pub mod dns;

pub use dns::{CellAnswer, DeferReason, Synthesis, SynthesizeCellAnswerUseCase};
