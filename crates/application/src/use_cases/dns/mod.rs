mod synthesize_cell_answer;

pub use synthesize_cell_answer::{CellAnswer, DeferReason, Synthesis, SynthesizeCellAnswerUseCase};
