//! Byte-stream compression port and the built-in algorithms.
//!
//! A [`Compressor`] wraps raw byte sources and sinks in decompressing /
//! compressing adapters. Compressors are referenced by registered name from
//! compressed object tags and selected per container for whole-file I/O.

use std::io::{self, Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

/// A compressing sink that must be finalized so buffered data and stream
/// trailers are flushed.
pub trait FinishWrite: Write {
    /// Flushes any buffered data and writes the stream trailer.
    fn finish(self: Box<Self>) -> io::Result<()>;
}

/// A pair of byte-stream adapters for one compression algorithm.
pub trait Compressor: Send + Sync {
    /// Wraps a raw byte source in a decompressing reader.
    fn wrap_reader<'a>(&self, source: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>>;

    /// Wraps a raw byte sink in a compressing writer. The caller must invoke
    /// [`FinishWrite::finish`] once all data is written.
    fn wrap_writer<'a>(&self, sink: Box<dyn Write + 'a>) -> io::Result<Box<dyn FinishWrite + 'a>>;

    /// True when bytes pass through unchanged. Enables zero-copy read paths.
    fn is_passthrough(&self) -> bool {
        false
    }
}

/// Runs `data` through the compressing side of `compressor`.
pub fn compress_bytes(compressor: &dyn Compressor, data: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut sink = compressor.wrap_writer(Box::new(&mut out))?;
    sink.write_all(data)?;
    sink.finish()?;
    Ok(out)
}

/// Runs `data` through the decompressing side of `compressor`.
pub fn decompress_bytes(compressor: &dyn Compressor, data: &[u8]) -> io::Result<Vec<u8>> {
    let mut source = compressor.wrap_reader(Box::new(data))?;
    let mut out = Vec::new();
    source.read_to_end(&mut out)?;
    Ok(out)
}

/// The identity algorithm: bytes are stored as-is.
pub struct NoCompression;

impl Compressor for NoCompression {
    fn wrap_reader<'a>(&self, source: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> {
        Ok(source)
    }

    fn wrap_writer<'a>(&self, sink: Box<dyn Write + 'a>) -> io::Result<Box<dyn FinishWrite + 'a>> {
        Ok(Box::new(Passthrough(sink)))
    }

    fn is_passthrough(&self) -> bool {
        true
    }
}

struct Passthrough<W: Write>(W);

impl<W: Write> Write for Passthrough<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<W: Write> FinishWrite for Passthrough<W> {
    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.0.flush()
    }
}

/// GZIP compression (RFC 1952).
pub struct GzipCompression;

impl Compressor for GzipCompression {
    fn wrap_reader<'a>(&self, source: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> {
        Ok(Box::new(GzDecoder::new(source)))
    }

    fn wrap_writer<'a>(&self, sink: Box<dyn Write + 'a>) -> io::Result<Box<dyn FinishWrite + 'a>> {
        Ok(Box::new(GzEncoder::new(sink, Compression::default())))
    }
}

impl<W: Write> FinishWrite for GzEncoder<W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish().map(|_| ())
    }
}

/// ZLIB / DEFLATE compression (RFC 1950).
pub struct ZlibCompression;

impl Compressor for ZlibCompression {
    fn wrap_reader<'a>(&self, source: Box<dyn Read + 'a>) -> io::Result<Box<dyn Read + 'a>> {
        Ok(Box::new(ZlibDecoder::new(source)))
    }

    fn wrap_writer<'a>(&self, sink: Box<dyn Write + 'a>) -> io::Result<Box<dyn FinishWrite + 'a>> {
        Ok(Box::new(ZlibEncoder::new(sink, Compression::default())))
    }
}

impl<W: Write> FinishWrite for ZlibEncoder<W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish().map(|_| ())
    }
}
