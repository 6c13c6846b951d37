// Domain-layer modules and shared errors/models
pub mod services {
    pub use crate::services::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}

pub mod sanitize {
    pub use crate::sanitize::*;
}

pub mod security {
    pub use crate::security::*;
}
