//! Form widget: state, debouncing and the endpoint client it talks through.

pub mod form_state {
    pub use crate::form_state::*;
}

pub mod form_controller {
    pub use crate::form_controller::*;
}

pub mod debounce {
    pub use crate::debounce::*;
}

pub mod lookup_client {
    pub use crate::lookup_client::*;
}
