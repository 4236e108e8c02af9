pub mod error;
mod locate;
pub mod mutate;
pub mod row;

pub use error::RenderError;
pub use mutate::{
    apply, Mutation, COUNT_ANCHOR_ID, DYNAMIC_FETCH_SCRIPT_ID, ROWS_ANCHOR_ID,
    TIMESTAMP_ANCHOR_ID,
};
pub use row::{render_row, render_rows};
