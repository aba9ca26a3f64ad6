//! A fast streaming decoder for Garmin's Flexible and Interoperable Data
//! Transfer format.
//!
//! FIT documents are self-describing: the stream interleaves definition
//! records, which declare the shape of later data records under a small local
//! slot number, with the data records themselves. [`Decoder`] tracks that
//! mutable schema table while streaming through a document of any size, and
//! lazily yields one [`Message`] per data record. Field values are pulled
//! from a message by record-relative field number through typed accessors;
//! absent fields and 'invalid' marker values are uniformly reported as no
//! value.
//!
//! ```
//! use std::{fs::File, io::BufReader};
//!
//! use cassette::Decoder;
//!
//! let file = File::open("afternoon-ride.fit")?;
//! let mut decoder = Decoder::open(BufReader::new(file))?;
//!
//! if !decoder.verify_checksum()? {
//!     eprintln!("checksum mismatch, continuing anyway");
//! }
//!
//! for message in decoder.messages() {
//!     let message = message?;
//!     if message.global_message_number() == 20 {
//!         if let Some(heart_rate) = message.get_number(3) {
//!             println!("heart rate: {heart_rate}");
//!         }
//!     }
//! }
//! ```
//!
//! The whole-document checksum can be verified independently with
//! [`Decoder::verify_checksum`] when the source supports seeking; a mismatch
//! is reported, not enforced. The [`profile`] module labels well-known
//! message and field numbers for display, and plays no part in decoding.

pub mod base_type;
pub mod crc;
pub mod decoder;
pub mod definition;
pub mod header;
pub mod message;
pub mod profile;

pub use decoder::{DecodeError, Decoder, Messages};
pub use definition::{FieldDescriptor, MessageDefinition};
pub use header::{FileHeader, HeaderError};
pub use message::{Message, TimestampRangeError};
