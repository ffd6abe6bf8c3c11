//! Wire protocol of the board's data-transfer characteristic.
//!
//! Each concern lives in its own layer:
//! - `layout`: byte offsets, markers and size limits (source of truth)
//! - `reader`: bounds-checked byte access
//! - `parser`: validation and hold decoding for one complete frame
//! - `encoder`: frame construction for the sending side
//! - `error`: explicit, actionable errors
//!
//! `checksum` and `color` hold the two small codecs the frame relies on.

pub mod checksum;
pub mod color;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod role;

pub use checksum::checksum8;
pub use color::{Rgb, decode_color, encode_color};
pub use encoder::{encode_frame, encode_holds};
pub use error::FrameError;
pub use parser::{Frame, parse_frame};
pub use role::Role;
