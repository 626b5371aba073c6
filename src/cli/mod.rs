//! CLI Module
//!
//! Command-line interface for lsbsign.

pub mod commands;

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::buffer::{ByteOrder, PcmFormat};
use crate::error::Result;

/// Lossless audio Ed25519 signer
#[derive(Parser, Debug)]
#[command(name = "lsbsign")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON config file (defaults to $LSBSIGN_CONFIG when set)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an Ed25519 key pair
    #[command(name = "keys")]
    #[command(group(
        ArgGroup::new("outputs")
            .required(true)
            .multiple(true)
            .args(["signing_key", "verifying_key"])
    ))]
    Keys {
        /// Signing key output path
        #[arg(long = "sk")]
        signing_key: Option<PathBuf>,

        /// Verifying key output path
        #[arg(long = "vk")]
        verifying_key: Option<PathBuf>,
    },

    /// Embed a signature in an audio file
    #[command(name = "sign")]
    Sign {
        /// Audio input path
        #[arg(short, long)]
        input: PathBuf,

        /// Audio output path (defaults to <input>_signed.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Signing key input path
        #[arg(long = "sk")]
        signing_key: Option<PathBuf>,

        #[command(flatten)]
        raw: RawLayoutArgs,
    },

    /// Check the signature embedded in an audio file or every file in a directory
    #[command(name = "verify")]
    Verify {
        /// Audio file or directory
        #[arg(short, long)]
        input: PathBuf,

        /// Verifying key input path
        #[arg(long = "vk")]
        verifying_key: Option<PathBuf>,

        /// Print a JSON report per file
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        raw: RawLayoutArgs,
    },

    /// Hide a text message in an audio file
    #[command(name = "embed")]
    Embed {
        /// Audio input path
        #[arg(short, long)]
        input: PathBuf,

        /// Audio output path
        #[arg(short, long)]
        output: PathBuf,

        /// Message to encode
        #[arg(short, long)]
        message: String,

        #[command(flatten)]
        raw: RawLayoutArgs,
    },

    /// Print the text message hidden in an audio file
    #[command(name = "extract")]
    Extract {
        /// Audio input path
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        raw: RawLayoutArgs,
    },

    /// Show layout, capacity and the embedded signature bytes
    #[command(name = "inspect")]
    Inspect {
        /// Audio input path
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        raw: RawLayoutArgs,
    },
}

/// Layout of headerless `.pcm`/`.raw` files. Ignored for WAV.
#[derive(Args, Debug, Clone)]
pub struct RawLayoutArgs {
    /// Bytes per sample
    #[arg(long, default_value_t = 2)]
    pub sample_width: usize,

    /// Interleaved channels
    #[arg(long, default_value_t = 1)]
    pub channels: u16,

    /// Frames per second
    #[arg(long, default_value_t = 44100)]
    pub frame_rate: u32,

    /// Sample byte order in the file (little or big)
    #[arg(long, default_value_t = ByteOrder::Little)]
    pub byte_order: ByteOrder,
}

impl RawLayoutArgs {
    /// Validate into a layout
    pub fn to_format(&self) -> Result<PcmFormat> {
        PcmFormat::new(
            self.sample_width,
            self.channels,
            self.frame_rate,
            self.byte_order,
        )
    }
}

impl Default for RawLayoutArgs {
    fn default() -> Self {
        RawLayoutArgs {
            sample_width: 2,
            channels: 1,
            frame_rate: 44100,
            byte_order: ByteOrder::Little,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sign_with_raw_layout() {
        let cli = Cli::try_parse_from([
            "lsbsign",
            "sign",
            "-i",
            "in.pcm",
            "--sk",
            "sk.pri",
            "--sample-width",
            "3",
            "--byte-order",
            "big",
        ])
        .unwrap();

        match cli.command {
            Commands::Sign { input, output, raw, .. } => {
                assert_eq!(input, PathBuf::from("in.pcm"));
                assert!(output.is_none());
                let format = raw.to_format().unwrap();
                assert_eq!(format.sample_width(), 3);
                assert_eq!(format.byte_order(), ByteOrder::Big);
            }
            other => panic!("Expected Sign, got: {:?}", other),
        }
    }

    #[test]
    fn test_keys_requires_an_output() {
        assert!(Cli::try_parse_from(["lsbsign", "keys"]).is_err());
        assert!(Cli::try_parse_from(["lsbsign", "keys", "--vk", "vk.pub"]).is_ok());
    }

    #[test]
    fn test_invalid_raw_width() {
        let args = RawLayoutArgs {
            sample_width: 6,
            ..RawLayoutArgs::default()
        };
        assert!(args.to_format().is_err());
    }

    #[test]
    fn test_zero_raw_channels_is_rejected() {
        let cli = Cli::try_parse_from(["lsbsign", "inspect", "-i", "in.pcm", "--channels", "0"])
            .unwrap();

        match cli.command {
            Commands::Inspect { raw, .. } => assert!(matches!(
                raw.to_format(),
                Err(crate::error::SignerError::InvalidChannelCount { channels: 0 })
            )),
            other => panic!("Expected Inspect, got: {:?}", other),
        }
    }
}
