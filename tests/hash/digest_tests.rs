// Tests for digest module

use hashsum::hash::{Algorithm, DigestEngine, FanOutWriter, HashSumError};
use std::fs;
use std::io::{self, Read, Write};
use tempfile::TempDir;

const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";
const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
const EMPTY_SM3: &str = "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b";

#[test]
fn test_empty_input_vectors() {
    let engine = DigestEngine::new();
    let digests = engine.compute_digests(io::empty()).unwrap();

    assert_eq!(digests.get(Algorithm::Md5), EMPTY_MD5);
    assert_eq!(digests.get(Algorithm::Sha1), EMPTY_SHA1);
    assert_eq!(digests.get(Algorithm::Sha256), EMPTY_SHA256);
    assert_eq!(
        digests.get(Algorithm::Sha512),
        "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
    );
    assert_eq!(digests.get(Algorithm::Sm3), EMPTY_SM3);
}

#[test]
fn test_abc_vectors() {
    let engine = DigestEngine::new();
    let digests = engine.compute_bytes(b"abc");

    assert_eq!(digests.get(Algorithm::Md5), "900150983cd24fb0d6963f7d28e17f72");
    assert_eq!(digests.get(Algorithm::Sha1), "a9993e364706816aba3e25717850c26c9cd0d89d");
    assert_eq!(
        digests.get(Algorithm::Sha256),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        digests.get(Algorithm::Sha512),
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
    );
    assert_eq!(
        digests.get(Algorithm::Sm3),
        "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
    );
}

#[test]
fn test_hex_lengths_and_case() {
    let engine = DigestEngine::new();
    let digests = engine.compute_bytes(b"some arbitrary content\x00\xff");

    for (algorithm, digest) in digests.iter() {
        assert_eq!(digest.len(), algorithm.hex_len(), "{}", algorithm);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
    assert_eq!(Algorithm::Md5.hex_len(), 32);
    assert_eq!(Algorithm::Sha1.hex_len(), 40);
    assert_eq!(Algorithm::Sha256.hex_len(), 64);
    assert_eq!(Algorithm::Sha512.hex_len(), 128);
    assert_eq!(Algorithm::Sm3.hex_len(), 64);
}

#[test]
fn test_iter_follows_column_order() {
    let digests = DigestEngine::new().compute_bytes(b"");
    let names: Vec<&str> = digests.iter().map(|(algorithm, _)| algorithm.name()).collect();
    assert_eq!(names, vec!["MD5", "SHA1", "SHA256", "SHA512", "SM3"]);
}

#[test]
fn test_determinism_across_files() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.bin");
    let second = dir.path().join("second.bin");
    fs::write(&first, b"identical bytes").unwrap();
    fs::write(&second, b"identical bytes").unwrap();

    let engine = DigestEngine::new();
    let a = engine.compute_file(&first).unwrap();
    let b = engine.compute_file(&second).unwrap();
    assert_eq!(a.digests, b.digests);
    assert_eq!(a.size, 15);
}

#[test]
fn test_different_content_different_digests() {
    let engine = DigestEngine::new();
    let a = engine.compute_bytes(b"line1\nline2\n");
    let b = engine.compute_bytes(b"line1\r\nline2\r\n");
    for algorithm in Algorithm::ALL {
        assert_ne!(a.get(algorithm), b.get(algorithm));
    }
}

#[test]
fn test_small_buffer_matches_one_shot() {
    // Larger than several chunks and not a multiple of the buffer size
    let data: Vec<u8> = (0..100_003u32).map(|i| (i % 251) as u8).collect();

    let chunked = DigestEngine::with_buffer_size(4096)
        .compute_digests(&data[..])
        .unwrap();
    let one_shot = DigestEngine::new().compute_bytes(&data);
    assert_eq!(chunked, one_shot);
}

#[test]
fn test_zero_buffer_size_is_clamped() {
    let engine = DigestEngine::with_buffer_size(0);
    assert_eq!(engine.buffer_size(), 1);
    let digests = engine.compute_digests(&b"abc"[..]).unwrap();
    assert_eq!(digests.get(Algorithm::Md5), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn test_fan_out_writer_counts_and_finalizes() {
    let mut fan_out = FanOutWriter::new();
    fan_out.write_all(b"a").unwrap();
    fan_out.write_all(b"bc").unwrap();
    assert_eq!(fan_out.bytes_written(), 3);

    let digests = fan_out.finalize();
    assert_eq!(digests.get(Algorithm::Md5), "900150983cd24fb0d6963f7d28e17f72");
}

struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::new(io::ErrorKind::Other, "device went away"));
        }
        self.served = true;
        buf[0] = b'x';
        Ok(1)
    }
}

#[test]
fn test_read_error_mid_stream() {
    let engine = DigestEngine::new();
    let result = engine.compute_digests(FailingReader { served: false });
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "device went away");
}

struct InterruptOnce {
    interrupted: bool,
    data: &'static [u8],
}

impl Read for InterruptOnce {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.interrupted {
            self.interrupted = true;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        }
        self.data.read(buf)
    }
}

#[test]
fn test_interrupted_read_is_retried() {
    let engine = DigestEngine::new();
    let digests = engine
        .compute_digests(InterruptOnce {
            interrupted: false,
            data: b"abc",
        })
        .unwrap();
    assert_eq!(digests.get(Algorithm::Md5), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn test_compute_file_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");

    let result = DigestEngine::new().compute_file(&missing);
    match result {
        Err(HashSumError::Io { path, operation, .. }) => {
            assert_eq!(path, missing);
            assert_eq!(operation, "opening");
        }
        other => panic!("Expected Io error, got {:?}", other),
    }
}

#[test]
fn test_hasher_output_size_matches_hex_len() {
    for algorithm in Algorithm::ALL {
        let hasher = algorithm.hasher();
        assert_eq!(hasher.output_size() * 2, algorithm.hex_len(), "{}", algorithm);
    }
}
