// Digest computation module
// Streams a reader once and feeds every chunk to all five accumulators

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use sm3::Sm3;

use super::error::HashSumError;

/// Default read chunk (1MB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Trait for hash accumulators fed by the fan-out writer
pub trait Hasher: Send {
    /// Update the hasher with new data
    fn update(&mut self, data: &[u8]);

    /// Finalize the hash and return the raw digest bytes
    fn finalize(self: Box<Self>) -> Vec<u8>;

    /// Get the output size in bytes
    fn output_size(&self) -> usize;
}

// md-5, sha1, sha2 and sm3 all implement digest 0.10
impl<D> Hasher for D
where
    D: Digest + Send,
{
    fn update(&mut self, data: &[u8]) {
        Digest::update(self, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        Digest::finalize(*self).to_vec()
    }

    fn output_size(&self) -> usize {
        <D as Digest>::output_size()
    }
}

/// The fixed set of algorithms, in report column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Sm3,
}

impl Algorithm {
    /// All algorithms in report column order
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha512,
        Algorithm::Sm3,
    ];

    /// Column name used in the report header
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5",
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha512 => "SHA512",
            Algorithm::Sm3 => "SM3",
        }
    }

    /// Length of the lowercase hex rendering
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha1 => 40,
            Algorithm::Sha256 | Algorithm::Sm3 => 64,
            Algorithm::Sha512 => 128,
        }
    }

    /// Fresh accumulator for this algorithm
    pub fn hasher(self) -> Box<dyn Hasher> {
        match self {
            Algorithm::Md5 => Box::new(Md5::new()),
            Algorithm::Sha1 => Box::new(Sha1::new()),
            Algorithm::Sha256 => Box::new(Sha256::new()),
            Algorithm::Sha512 => Box::new(Sha512::new()),
            Algorithm::Sm3 => Box::new(Sm3::new()),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hex digests of one input, one per [`Algorithm`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSet {
    digests: [String; 5],
}

impl DigestSet {
    /// Hex digest for `algorithm`
    pub fn get(&self, algorithm: Algorithm) -> &str {
        &self.digests[algorithm.index()]
    }

    /// Digests in report column order
    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &str)> + '_ {
        Algorithm::ALL
            .iter()
            .map(move |&algorithm| (algorithm, self.get(algorithm)))
    }
}

/// Writer that forwards every chunk to one accumulator per algorithm
///
/// Owned by a single digesting call; nothing is shared between files.
pub struct FanOutWriter {
    sinks: Vec<(Algorithm, Box<dyn Hasher>)>,
    bytes_written: u64,
}

impl FanOutWriter {
    pub fn new() -> Self {
        Self {
            sinks: Algorithm::ALL
                .iter()
                .map(|&algorithm| (algorithm, algorithm.hasher()))
                .collect(),
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Consume the writer and render every digest as lowercase hex
    pub fn finalize(self) -> DigestSet {
        let mut digests: [String; 5] = Default::default();
        for (algorithm, hasher) in self.sinks {
            digests[algorithm.index()] = hex::encode(hasher.finalize());
        }
        DigestSet { digests }
    }
}

impl Default for FanOutWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for FanOutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (_, hasher) in self.sinks.iter_mut() {
            hasher.update(buf);
        }
        self.bytes_written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Digests of a file together with the number of bytes read
#[derive(Debug, Clone)]
pub struct FileDigest {
    pub digests: DigestSet,
    pub size: u64,
}

/// Multi-digest engine with streaming I/O
#[derive(Debug, Clone)]
pub struct DigestEngine {
    buffer_size: usize,
}

impl DigestEngine {
    /// Create a new DigestEngine with default buffer size (1MB)
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Create a new DigestEngine with custom buffer size
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Compute all digests of `reader` in a single pass
    ///
    /// A read error discards the partial accumulators.
    pub fn compute_digests<R: Read>(&self, reader: R) -> io::Result<DigestSet> {
        self.stream(reader).map(FanOutWriter::finalize)
    }

    /// Compute all digests of an in-memory buffer
    pub fn compute_bytes(&self, data: &[u8]) -> DigestSet {
        let mut fan_out = FanOutWriter::new();
        // Infallible: the fan-out writer never returns an error
        let _ = fan_out.write_all(data);
        fan_out.finalize()
    }

    /// Open `path` and compute all digests of its contents
    pub fn compute_file(&self, path: &Path) -> Result<FileDigest, HashSumError> {
        let file = File::open(path)
            .map_err(|e| HashSumError::from_io_error(e, "opening", path))?;

        let fan_out = self
            .stream(file)
            .map_err(|e| HashSumError::from_io_error(e, "reading", path))?;

        let size = fan_out.bytes_written();
        Ok(FileDigest {
            digests: fan_out.finalize(),
            size,
        })
    }

    fn stream<R: Read>(&self, mut reader: R) -> io::Result<FanOutWriter> {
        let mut fan_out = FanOutWriter::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            fan_out.write_all(&buffer[..bytes_read])?;
        }

        Ok(fan_out)
    }
}

impl Default for DigestEngine {
    fn default() -> Self {
        Self::new()
    }
}
