pub mod action;
pub mod example;
mod fields;
pub mod schema;

pub use action::{
    Action, ActionType, HttpMethod, OBJECT_TYPE, Validator, WebhookConstants,
    depends_on_from_csv, depends_on_to_csv,
};
pub use example::{Example, ExampleActionFields};
pub use fields::RawFields;
pub use schema::{ActionSchema, DRAFT_07};
