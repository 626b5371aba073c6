//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fmt;
use std::path::{Path, PathBuf};

use ed25519_dalek::VerifyingKey;
use log::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::SignerConfig;
use crate::engine::buffer::PcmFormat;
use crate::engine::io::{is_supported_audio, load_audio, save_audio};
use crate::error::{Result, SignerError};
use crate::report::VerificationReport;
use crate::signing::{self, fingerprint, keys, SIGNATURE_SLOT_BYTES};
use crate::stego::lsb;

/// Generate a key pair and write whichever halves were requested.
pub fn generate_keys(
    signing_key_path: Option<&Path>,
    verifying_key_path: Option<&Path>,
) -> Result<()> {
    let (signing_key, verifying_key) = keys::generate_keypair();
    info!("Generated key pair {}", fingerprint(&verifying_key));

    if let Some(path) = signing_key_path {
        keys::save_signing_key(&signing_key, path)?;
        println!("Signing key written: {}", path.display());
    }

    if let Some(path) = verifying_key_path {
        keys::save_verifying_key(&verifying_key, path)?;
        println!("Verifying key written: {}", path.display());
    }

    println!("Fingerprint: {}", fingerprint(&verifying_key));
    Ok(())
}

/// Sign an audio file, writing the signed copy.
pub fn sign(
    input: &Path,
    output: Option<&Path>,
    signing_key_path: Option<&Path>,
    raw_layout: &PcmFormat,
    config: &SignerConfig,
) -> Result<()> {
    let key_path = signing_key_path
        .map(Path::to_path_buf)
        .or_else(|| config.signing_key.clone())
        .ok_or(SignerError::MissingKey {
            role: "signing",
            flag: "sk",
        })?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.default_output_path(input));

    info!("Signing {} -> {}", input.display(), output.display());

    let signing_key = keys::load_signing_key(&key_path)?;
    let signature = signing::sign_file(input, &output, &signing_key, raw_layout)?;

    println!("Signed: {}", output.display());
    println!("Signer: {}", fingerprint(&signing_key.verifying_key()));
    println!("Signature: {}", to_hex(&signature));
    Ok(())
}

/// Verify a file, or every audio file under a directory.
///
/// Returns true only if every checked file is authentic.
pub fn verify(
    input: &Path,
    verifying_key_path: Option<&Path>,
    json: bool,
    raw_layout: &PcmFormat,
    config: &SignerConfig,
) -> Result<bool> {
    let key_path = verifying_key_path
        .map(Path::to_path_buf)
        .or_else(|| config.verifying_key.clone())
        .ok_or(SignerError::MissingKey {
            role: "verifying",
            flag: "vk",
        })?;
    let verifying_key = keys::load_verifying_key(&key_path)?;

    if !input.is_dir() {
        let report = verify_one(input, &verifying_key, raw_layout)?;
        print_report(&report, json, false)?;
        return Ok(report.authentic);
    }

    info!("Verifying audio files under {}", input.display());

    let entries = WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter(|entry| match entry {
            Ok(entry) => entry.file_type().is_file() && is_supported_audio(entry.path()),
            Err(_) => true,
        })
        .map(|entry| entry.map(DirEntry::into_path));

    verify_batch(entries, &verifying_key, json, raw_layout)
}

/// Verify every path yielded by a directory walk.
///
/// A walk error counts as a failed check: the file it hid was never verified.
fn verify_batch<I, E>(
    entries: I,
    verifying_key: &VerifyingKey,
    json: bool,
    raw_layout: &PcmFormat,
) -> Result<bool>
where
    I: IntoIterator<Item = std::result::Result<PathBuf, E>>,
    E: fmt::Display,
{
    let mut checked = 0usize;
    let mut all_authentic = true;

    for entry in entries {
        checked += 1;
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                all_authentic = false;
                warn!("Skipped unreadable entry: {}", e);
                println!("error: {}", e);
                continue;
            }
        };

        match verify_one(&path, verifying_key, raw_layout) {
            Ok(report) => {
                all_authentic &= report.authentic;
                print_report(&report, json, true)?;
            }
            Err(e) => {
                all_authentic = false;
                warn!("{}: {}", path.display(), e);
                println!("{}: error ({})", path.display(), e.error_code());
            }
        }
    }

    if checked == 0 {
        warn!("No audio files found");
        return Ok(false);
    }

    Ok(all_authentic)
}

/// Hide a text message in an audio file.
pub fn embed(input: &Path, output: &Path, message: &str, raw_layout: &PcmFormat) -> Result<()> {
    info!("Embedding {} bytes into {}", message.len(), input.display());

    let mut buffer = load_audio(input, raw_layout)?;
    lsb::embed_message(&mut buffer, message)?;
    save_audio(&buffer, output)?;

    println!("Message embedded: {}", output.display());
    Ok(())
}

/// Print the text message hidden in an audio file.
pub fn extract(input: &Path, raw_layout: &PcmFormat) -> Result<()> {
    let buffer = load_audio(input, raw_layout)?;
    let message = lsb::extract_message(&buffer)?;
    println!("{}", message);
    Ok(())
}

/// Print layout, capacity and the signature region of an audio file.
pub fn inspect(input: &Path, raw_layout: &PcmFormat) -> Result<()> {
    let buffer = load_audio(input, raw_layout)?;
    let format = buffer.format();
    let capacity = lsb::capacity(&buffer);

    println!("File: {}", input.display());
    println!("{:-<60}", "");
    println!(
        "Sample width: {} bytes ({:?}, {}-endian)",
        format.sample_width(),
        format.encoding(),
        format.byte_order()
    );
    println!("Channels: {}", format.channels());
    println!("Frame rate: {} Hz", format.frame_rate());
    println!("Duration: {:.3}s", buffer.duration_secs());
    println!("LSB capacity: {} bytes", capacity);

    if capacity >= SIGNATURE_SLOT_BYTES {
        let signature = signing::extract_signature(&buffer)?;
        println!("Signature region: {}", to_hex(&signature));
    } else {
        println!("Signature region: (too short to hold a signature)");
    }

    Ok(())
}

fn verify_one(
    path: &Path,
    verifying_key: &VerifyingKey,
    raw_layout: &PcmFormat,
) -> Result<VerificationReport> {
    let mut buffer = load_audio(path, raw_layout)?;
    let authentic = signing::verify(&mut buffer, verifying_key)?;
    Ok(VerificationReport::new(path, &buffer, verifying_key, authentic))
}

fn print_report(report: &VerificationReport, json: bool, with_path: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else if with_path {
        println!("{}: {}", report.path.display(), report.authentic);
    } else {
        println!("{}", report.authentic);
    }
    Ok(())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::buffer::ByteOrder;
    use crate::engine::io::{export_wav, generate_test_tone};
    use tempfile::tempdir;

    fn raw() -> PcmFormat {
        PcmFormat::new(2, 1, 44100, ByteOrder::Little).unwrap()
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&[0x00, 0xAB, 0x0F]), "00ab0f");
    }

    #[test]
    fn test_sign_without_key_is_missing_key() {
        let result = sign(
            Path::new("in.wav"),
            None,
            None,
            &raw(),
            &SignerConfig::default(),
        );
        assert!(matches!(
            result,
            Err(SignerError::MissingKey { role: "signing", .. })
        ));
    }

    #[test]
    fn test_sign_and_verify_directory() {
        let dir = tempdir().unwrap();
        let sk = dir.path().join("sk.pri");
        let vk = dir.path().join("vk.pub");
        generate_keys(Some(sk.as_path()), Some(vk.as_path())).unwrap();

        let audio_dir = dir.path().join("audio");
        std::fs::create_dir(&audio_dir).unwrap();
        let format = PcmFormat::new(2, 2, 8000, ByteOrder::Little).unwrap();
        let tone = generate_test_tone(440.0, 0.25, format).unwrap();

        for name in ["a", "b"] {
            let input = dir.path().join(format!("{}.wav", name));
            export_wav(&tone, &input).unwrap();
            let output = audio_dir.join(format!("{}.wav", name));
            sign(
                &input,
                Some(output.as_path()),
                Some(sk.as_path()),
                &raw(),
                &SignerConfig::default(),
            )
            .unwrap();
        }

        let config = SignerConfig {
            verifying_key: Some(vk.clone()),
            ..SignerConfig::default()
        };
        assert!(verify(&audio_dir, None, false, &raw(), &config).unwrap());

        // An unsigned file in the batch fails the whole run
        export_wav(&tone, &audio_dir.join("c.wav")).unwrap();
        assert!(!verify(&audio_dir, None, true, &raw(), &config).unwrap());
    }

    #[test]
    fn test_walk_error_fails_batch() {
        let dir = tempdir().unwrap();
        let sk = dir.path().join("sk.pri");
        let vk = dir.path().join("vk.pub");
        generate_keys(Some(sk.as_path()), Some(vk.as_path())).unwrap();
        let verifying_key = keys::load_verifying_key(&vk).unwrap();

        let input = dir.path().join("in.wav");
        let signed = dir.path().join("signed.wav");
        let format = PcmFormat::new(2, 1, 8000, ByteOrder::Little).unwrap();
        export_wav(&generate_test_tone(440.0, 0.1, format).unwrap(), &input).unwrap();
        sign(
            &input,
            Some(signed.as_path()),
            Some(sk.as_path()),
            &raw(),
            &SignerConfig::default(),
        )
        .unwrap();

        let readable: Vec<std::result::Result<PathBuf, &str>> = vec![Ok(signed.clone())];
        assert!(verify_batch(readable, &verifying_key, false, &raw()).unwrap());

        // A subdirectory that could not be listed leaves its files unchecked
        let with_error = vec![Ok(signed), Err("audio/locked: permission denied")];
        assert!(!verify_batch(with_error, &verifying_key, false, &raw()).unwrap());

        let empty: Vec<std::result::Result<PathBuf, &str>> = Vec::new();
        assert!(!verify_batch(empty, &verifying_key, false, &raw()).unwrap());
    }

    #[test]
    fn test_embed_and_extract() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.wav");
        let output = dir.path().join("out.wav");
        let format = PcmFormat::new(3, 1, 8000, ByteOrder::Little).unwrap();
        export_wav(&generate_test_tone(220.0, 0.1, format).unwrap(), &input).unwrap();

        embed(&input, &output, "made by hand", &raw()).unwrap();
        let buffer = load_audio(&output, &raw()).unwrap();
        assert_eq!(lsb::extract_message(&buffer).unwrap(), "made by hand");

        extract(&output, &raw()).unwrap();
        inspect(&output, &raw()).unwrap();
    }
}
