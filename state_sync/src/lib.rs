mod cell;
mod observable;
mod view_state;

pub use cell::{CommitTicket, StateCell};
pub use observable::Observable;
pub use view_state::ViewState;
