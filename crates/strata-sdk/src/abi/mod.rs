//! ABI encoding and decoding for contract calls
//!
//! Call arguments arrive as a JSON array of single-key objects, each key a
//! type descriptor and each value a string (or list of strings):
//!
//! ```rust
//! use strata_sdk::abi::{pack, Method};
//!
//! let method = Method::parse("transfer(address,uint256)").unwrap();
//! let data = pack(
//!     &method,
//!     r#"[{"address":"TLZVYZskxoJt4M4bYHPJm5hdM4PUWSGNPr"},{"uint256":"1000"}]"#,
//! )
//! .unwrap();
//!
//! assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
//! assert_eq!(data.len(), 4 + 32 + 32);
//! ```
//!
//! Encoding runs in three steps: [`resolve_type`] parses each descriptor,
//! [`coerce`] converts the JSON value, and the encoder packs the tokens.

mod coerce;
mod decode;
mod encode;
mod method;
mod resolve;
mod types;

pub use coerce::{coerce, Value};
pub use decode::{decode, decode_output, Decoded};
pub use encode::{encode_params, load_params, pack, padded_params, selector_hash, to_token};
pub use method::Method;
pub use resolve::{normalize_type, resolve_type};
pub use types::{ParamType, Token, I256};
