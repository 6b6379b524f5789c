//! Connection configuration
//!
//! A connection is described by a URL plus a property map. Both are parsed
//! once into a `ConnectionConfig`, which is then owned by a
//! `ConnectionContext` and passed explicitly to everything that needs it.
//!
//! # Options
//!
//! Only the keys in `RECOGNIZED_OPTIONS` are applied. Unknown keys are
//! ignored; recognized keys with malformed values fail the parse.

mod connection;
mod context;
mod errors;
mod policy;
mod url;

pub use connection::{ConnectionConfig, RECOGNIZED_OPTIONS};
pub use context::ConnectionContext;
pub use errors::{ConfigError, ConfigResult};
pub use policy::{BasePolicy, ClientPolicy, QueryPolicy, ScanPolicy, DEFAULT_RECORDS_PER_SECOND};
pub use url::{parse_url, Host, ParsedUrl, DEFAULT_PORT};
