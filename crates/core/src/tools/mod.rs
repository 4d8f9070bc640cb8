//! Invokers for the external LRPT tool chain.
//!
//! Three programs do the actual signal work; this module only builds their
//! command lines, runs them one at a time, and checks what they left on disk:
//!
//! - [`MeteorDemod`]: IQ recording → symbol file (`.s`), stdout to a log file.
//!   Success is judged by the symbol file existing, not by exit code.
//! - [`Medet`]: symbol file → one bitmap per color channel. Success is the
//!   decoder's exit code.
//! - [`ImageMagick`]: bitmaps → false-color and infrared PNGs, each reported
//!   only if it exists.
//!
//! # Example
//!
//! ```ignore
//! use meteor_core::tools::{Demodulator, MeteorDemod, DemodulatorConfig};
//!
//! let demod = MeteorDemod::new(DemodulatorConfig::new("/datadrive/meteor/bin/meteor_demod"));
//! if let Some(symbols) = demod.demodulate(Path::new("data_1.iq"), &profile).await? {
//!     println!("symbols at {}", symbols.display());
//! }
//! ```

mod config;
mod error;
mod imagemagick;
mod medet;
mod meteor_demod;
mod process;
mod traits;
mod types;

pub use config::{CompositorConfig, DecoderConfig, DemodulatorConfig, ToolsConfig};
pub use error::ToolError;
pub use imagemagick::ImageMagick;
pub use medet::Medet;
pub use meteor_demod::MeteorDemod;
pub use traits::{Compositor, Decoder, Demodulator};
pub use types::{
    channel_bitmap, demod_log_path, false_color_path, infrared_path, symbol_path,
    CompositeImages, DecodeOutcome,
};
