use binary_rw::{BinaryReader, BinaryWriter, Endian, ReadStream, SeekStream, WriteStream};

use crate::bit_stream::{pack_payload, unpack_payload};
use crate::error::{DecodeError, EncodeError};
use crate::format::{
    invert_records, FileHeader, SymbolCodeRecord, ToVec, HEADER_BYTES, RECORD_BYTES,
};
use crate::huffman::{build_tree, CodeTable, FrequencyTable};

#[derive(Debug)]
pub struct Stats {
    pub unique_symbols: usize,
    pub padding_bits: u8,
    pub payload_bytes: usize,
}

impl Stats {
    pub fn archive_bytes(&self) -> usize {
        HEADER_BYTES + self.unique_symbols * RECORD_BYTES + self.payload_bytes
    }
}

/// Compresses `data` into `sink`: header, one record per distinct symbol,
/// then the bit-packed payload. Empty input produces the bare header.
pub fn compress<W: WriteStream>(data: &[u8], sink: &mut W) -> Result<Stats, EncodeError> {
    let frequencies = FrequencyTable::from_bytes(data);
    let mut writer = BinaryWriter::new(sink, Endian::Big);

    let root = match build_tree(&frequencies) {
        Some(root) => root,
        None => {
            let header = FileHeader {
                padding_bits: 0,
                unique_symbols: 0,
            };
            writer.write_bytes(header.to_vec())?;
            return Ok(Stats {
                unique_symbols: 0,
                padding_bits: 0,
                payload_bytes: 0,
            });
        }
    };

    let table = CodeTable::from_tree(&root)?;
    let padding_bits = table.padding_bits(&frequencies);

    let header = FileHeader {
        padding_bits,
        unique_symbols: table.len(),
    };
    writer.write_bytes(header.to_vec())?;
    for (symbol, code) in table.iter() {
        writer.write_bytes(SymbolCodeRecord { symbol, code }.to_vec())?;
    }

    let payload = pack_payload(data, &table)?;
    writer.write_bytes(&payload)?;

    Ok(Stats {
        unique_symbols: table.len(),
        padding_bits,
        payload_bytes: payload.len(),
    })
}

/// Reverses `compress`: parses header and symbol table, then walks the
/// payload bits back into the original bytes.
pub fn decompress<R: ReadStream, W: WriteStream>(
    source: &mut R,
    sink: &mut W,
) -> Result<(), DecodeError> {
    let (header, records, payload) = read_archive(source)?;
    if header.unique_symbols == 0 {
        return Ok(());
    }

    let codes = invert_records(&records)?;
    let output = unpack_payload(&payload, header.padding_bits, &codes)?;

    let mut writer = BinaryWriter::new(sink, Endian::Big);
    writer.write_bytes(output)?;
    Ok(())
}

/// Header and symbol table of an existing archive, for display.
pub fn read_archive_summary<R: ReadStream>(
    source: &mut R,
) -> Result<(FileHeader, Vec<SymbolCodeRecord>), DecodeError> {
    let (header, records, _) = read_archive(source)?;
    Ok((header, records))
}

fn read_archive<R: ReadStream>(
    source: &mut R,
) -> Result<(FileHeader, Vec<SymbolCodeRecord>, Vec<u8>), DecodeError> {
    let total_bytes = source.len()?;
    let mut reader = BinaryReader::new(source, Endian::Big);

    let header_bytes = reader
        .read_bytes(HEADER_BYTES)
        .map_err(|_| DecodeError::MalformedHeader("file shorter than its header".into()))?;
    let header = FileHeader::parse(&header_bytes, total_bytes - HEADER_BYTES)?;

    let record_region = header.unique_symbols * RECORD_BYTES;
    if total_bytes < HEADER_BYTES + record_region {
        return Err(DecodeError::MalformedHeader(format!(
            "symbol table needs {record_region} bytes, {} present",
            total_bytes - HEADER_BYTES
        )));
    }

    let record_bytes = reader.read_bytes(record_region)?;
    let mut records = Vec::with_capacity(header.unique_symbols);
    for chunk in record_bytes.chunks_exact(RECORD_BYTES) {
        records.push(SymbolCodeRecord::try_from(chunk)?);
    }

    let payload = reader.read_bytes(total_bytes - HEADER_BYTES - record_region)?;
    Ok((header, records, payload))
}
