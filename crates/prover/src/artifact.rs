//! Binary proving-system files.
//!
//! Layout (header big-endian):
//!
//! ```text
//! [u32 inclusion tree depth][u32 inclusion number of UTXOs]
//! [u32 non-inclusion tree depth][u32 non-inclusion number of UTXOs]
//! [proving key][verifying key][compiled circuit]
//! ```
//!
//! The three trailing artifacts use arkworks' compressed canonical encoding,
//! which is self-delimiting. Standalone key files hold a single compressed
//! key with no header.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use ark_bn254::Bn254;
use ark_groth16::{ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::{ProverError, Result};
use crate::observer::{ProverEvent, ProverObserver};
use crate::setup::{default_observer, ProvingSystem};
use crate::shape::{compile, CircuitShape, CompiledCircuit};

/// Counts bytes passed through so failures can report how far they got.
pub struct CountingWriter<W> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

pub struct CountingReader<R> {
    inner: R,
    bytes: u64,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, bytes: 0 }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }
}

fn write_header<W: Write>(writer: &mut CountingWriter<W>, shape: &CircuitShape) -> Result<()> {
    let words = [
        shape.inclusion_tree_depth,
        shape.inclusion_number_of_utxos,
        shape.non_inclusion_tree_depth,
        shape.non_inclusion_number_of_utxos,
    ];
    for word in words {
        let written = writer.bytes_written();
        writer
            .write_all(&word.to_be_bytes())
            .map_err(|e| ProverError::io("Writing header", written, e))?;
    }
    Ok(())
}

fn read_header<R: Read>(reader: &mut CountingReader<R>) -> Result<CircuitShape> {
    let mut words = [0u32; 4];
    for word in &mut words {
        let mut buf = [0u8; 4];
        let read = reader.bytes_read();
        reader
            .read_exact(&mut buf)
            .map_err(|e| ProverError::io("Reading header", read, e))?;
        *word = u32::from_be_bytes(buf);
    }
    let [inclusion_tree_depth, inclusion_number_of_utxos, non_inclusion_tree_depth, non_inclusion_number_of_utxos] =
        words;
    Ok(CircuitShape::combined(
        inclusion_tree_depth,
        inclusion_number_of_utxos,
        non_inclusion_tree_depth,
        non_inclusion_number_of_utxos,
    ))
}

fn write_artifact<W: Write, T: CanonicalSerialize>(
    writer: &mut CountingWriter<W>,
    what: &str,
    artifact: &T,
) -> Result<()> {
    artifact
        .serialize_compressed(&mut *writer)
        .map_err(|e| ProverError::from_serialization(what, writer.bytes_written(), e))
}

fn read_artifact<R: Read, T: CanonicalDeserialize>(
    reader: &mut CountingReader<R>,
    what: &str,
) -> Result<T> {
    T::deserialize_compressed(&mut *reader)
        .map_err(|e| ProverError::from_deserialization(what, reader.bytes_read(), e))
}

impl ProvingSystem {
    /// Serialize the whole system. Returns the number of bytes written.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<u64> {
        let mut writer = CountingWriter::new(writer);
        write_header(&mut writer, &self.compiled.shape)?;
        write_artifact(&mut writer, "proving key", &self.proving_key)?;
        write_artifact(&mut writer, "verifying key", self.verifying_key())?;
        write_artifact(&mut writer, "compiled circuit", &self.compiled)?;

        let written = writer.bytes_written();
        writer
            .flush()
            .map_err(|e| ProverError::io("Flushing proving system", written, e))?;
        Ok(written)
    }

    /// Inverse of [`ProvingSystem::write_to`]. The header shape is recompiled
    /// and must agree with the stored circuit summary and the keys.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        Self::read_from_with(reader, default_observer())
    }

    pub fn read_from_with<R: Read>(reader: R, observer: Arc<dyn ProverObserver>) -> Result<Self> {
        let mut reader = CountingReader::new(reader);

        let shape = read_header(&mut reader)?;
        let expected = compile(shape).map_err(|e| {
            ProverError::malformed("proving system header", format!("{shape}: {e}"))
        })?;

        let proving_key: ProvingKey<Bn254> = read_artifact(&mut reader, "proving key")?;
        let verifying_key: VerifyingKey<Bn254> = read_artifact(&mut reader, "verifying key")?;
        let compiled: CompiledCircuit = read_artifact(&mut reader, "compiled circuit")?;

        if compiled != expected {
            return Err(ProverError::malformed(
                "compiled circuit",
                format!("{compiled:?} does not match {expected:?}"),
            ));
        }

        observer.on_event(&ProverEvent::ArtifactRead {
            what: "proving system",
            bytes: reader.bytes_read(),
        });
        Self::from_parts(compiled, proving_key, verifying_key, observer)
    }

    /// Write to `path`, syncing before returning so a reported success is
    /// durable.
    pub fn write_to_file(&self, path: &Path) -> Result<u64> {
        let context = format!("Writing {}", path.display());
        let file = File::create(path).map_err(|e| ProverError::io(&context, 0, e))?;

        let mut writer = BufWriter::new(file);
        let written = self.write_to(&mut writer)?;
        let file = writer
            .into_inner()
            .map_err(|e| ProverError::io(&context, written, e.into_error()))?;
        file.sync_all()
            .map_err(|e| ProverError::io(&context, written, e))?;

        self.observer().on_event(&ProverEvent::ArtifactWritten {
            what: "proving system",
            bytes: written,
        });
        Ok(written)
    }

    pub fn read_from_file(path: &Path) -> Result<Self> {
        Self::read_from_file_with(path, default_observer())
    }

    pub fn read_from_file_with(path: &Path, observer: Arc<dyn ProverObserver>) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| ProverError::io(format!("Opening {}", path.display()), 0, e))?;
        Self::read_from_with(BufReader::new(file), observer)
    }

    /// The verifying key alone, compressed.
    pub fn verifying_key_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.verifying_key()
            .serialize_compressed(&mut bytes)
            .map_err(|e| ProverError::from_serialization("verifying key", bytes.len() as u64, e))?;
        Ok(bytes)
    }

    /// Write the verifying key as a standalone file, readable by
    /// [`ProvingSystem::import`].
    pub fn export_verifying_key(&self, path: &Path) -> Result<u64> {
        let written = write_key_file(path, "verifying key", self.verifying_key())?;
        self.observer().on_event(&ProverEvent::ArtifactWritten {
            what: "verifying key",
            bytes: written,
        });
        Ok(written)
    }

    pub fn export_proving_key(&self, path: &Path) -> Result<u64> {
        let written = write_key_file(path, "proving key", &self.proving_key)?;
        self.observer().on_event(&ProverEvent::ArtifactWritten {
            what: "proving key",
            bytes: written,
        });
        Ok(written)
    }
}

/// Free-function form of [`ProvingSystem::export_verifying_key`].
pub fn export_verifying_key(system: &ProvingSystem, path: &Path) -> Result<u64> {
    system.export_verifying_key(path)
}

pub(crate) fn write_key_file<T: CanonicalSerialize>(path: &Path, what: &str, key: &T) -> Result<u64> {
    let context = format!("Writing {what} to {}", path.display());
    let file = File::create(path).map_err(|e| ProverError::io(&context, 0, e))?;

    let mut writer = CountingWriter::new(BufWriter::new(file));
    write_artifact(&mut writer, what, key)?;
    let written = writer.bytes_written();
    let file = writer
        .into_inner()
        .into_inner()
        .map_err(|e| ProverError::io(&context, written, e.into_error()))?;
    file.sync_all()
        .map_err(|e| ProverError::io(&context, written, e))?;
    Ok(written)
}

pub(crate) fn read_key_file<T: CanonicalDeserialize>(
    path: &Path,
    what: &'static str,
    observer: &dyn ProverObserver,
) -> Result<T> {
    let file = File::open(path)
        .map_err(|e| ProverError::io(format!("Opening {what} {}", path.display()), 0, e))?;

    let mut reader = CountingReader::new(BufReader::new(file));
    let key = read_artifact(&mut reader, what)?;
    observer.on_event(&ProverEvent::ArtifactRead {
        what,
        bytes: reader.bytes_read(),
    });
    Ok(key)
}
