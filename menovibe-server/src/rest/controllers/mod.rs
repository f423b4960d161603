pub mod card;
pub mod knowledge;
pub mod query;
pub mod tasks;

pub use card::CardController;
pub use knowledge::KnowledgeController;
pub use query::QueryController;
pub use tasks::{TaskController, TaskRegistry};
