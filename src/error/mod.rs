mod relay;

pub use relay::{EXHAUSTED_PREFIX, RelayError};
