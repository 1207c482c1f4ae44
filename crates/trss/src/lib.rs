//! Client library for the TRSS skin database.
//!
//! Two concerns live here: the skin wire codec (an 18 × 20 colour grid
//! packed into a `trSkin1…` string) and the typed action client that talks
//! to the server's `users` and `skins` endpoints.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate performs no I/O. The client
//! delivers requests through the [`Transport`] trait; `trss-http` supplies
//! the HTTP implementation.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`skin`] | Wire codec, `SkinGrid`, `EncodedSkin`, shape validators |
//! | [`response`] | Raw body classification |
//! | [`client`] | `TrssClient`, one method per server action |
//! | [`actions`] | Action catalogue and endpoint routing |
//! | [`transport`] | `Transport` port, `FormRequest`, `TransportError` |
//! | [`config`] | Endpoint configuration |
//! | [`color`] | Colour normalisation port and default implementation |
//! | [`identifiers`] | Newtype identifiers (`UserId`, `SkinId`, `Token`, …) |
//! | [`types`] | Typed response records |
//! | [`errors`] | `ClientError`, `ErrorCode`, `ValidationError`, `RetryPolicy` |
//!
//! ## Example
//!
//! ```rust
//! use trss::skin::{SkinGrid, EncodedSkin};
//!
//! let mut grid = SkinGrid::filled("#FFFFFF").unwrap();
//! grid.set_cell(0, 0, "#FF0000").unwrap();
//! let wire = EncodedSkin::from_grid(&grid).unwrap();
//! assert!(wire.as_str().starts_with("trSkin1"));
//! assert_eq!(wire.to_grid().unwrap().cell(0, 0), Some("#FF0000FF"));
//! ```

pub mod actions;
pub mod client;
pub mod color;
pub mod config;
pub mod errors;
pub mod identifiers;
pub mod response;
pub mod skin;
pub mod transport;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use actions::{Action, Endpoint};
pub use client::TrssClient;
pub use color::{ColorNormalizer, CssColorNormalizer, Rgb};
pub use config::{ApiConfig, Endpoints, DEFAULT_BASE_URL};
pub use errors::{ClientError, ErrorCode, RetryPolicy, ValidationError};
pub use identifiers::{SkinId, SkinName, Token, UserId};
pub use response::{classify, Classified, Payload};
pub use skin::{
    decode, encode, is_decoded_skin, is_encoded_skin, DecodeError, DecodedSkin, EncodeError,
    EncodedSkin, Layout, SkinGrid,
};
pub use transport::{FormRequest, Transport, TransportError};
pub use types::{ChangedSkin, SkinInfo, UserInfo, UserInfoByToken};
