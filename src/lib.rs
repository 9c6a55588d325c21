//! cfgtree: typed configuration from files, environment variables and flags
//!
//! Every source is first turned into the same order-preserving node tree,
//! which is then decoded into a user type through runtime reflection.
//! Sources are tried in order (flags, environment, file) and the first one
//! that has configuration wins.

pub mod cli;
pub mod codec;
pub mod defaults;
pub mod env;
pub mod error;
pub mod file;
pub mod flag;
pub mod node;
pub mod reflect;
pub mod types;
pub mod value;

pub use codec::{DecodeOptions, EncodeOptions, decode, encode};
pub use error::ConfigError;
pub use node::Node;
pub use reflect::{ConfigStruct, Configurable, ScalarCodec};
pub use types::Duration;
pub use value::{RawMap, RawValue};
