pub mod answer;
pub mod insights;
pub mod problem;

pub use answer::{
    Attempt, DifficultyFeedback, MistakeCategory, MistakeRecord, RecordAttemptRequest,
    StatusResponse,
};
pub use insights::StudentInsights;
pub use problem::{GenerateProblemsRequest, Operands, Operation, Problem, UnknownOperation};
