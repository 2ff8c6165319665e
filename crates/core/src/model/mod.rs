mod ids;
mod question;
mod session;

pub use ids::{ParseIdError, QuestionId, SessionId};
pub use question::{Category, Difficulty, Question, QuestionError};
pub use session::{AnswerRecord, Session, SessionError};
