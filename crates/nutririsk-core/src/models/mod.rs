pub mod evaluation;
pub mod subject;
