mod bit_stream;
mod codec;
mod error;
mod format;
mod huffman;

use std::path::Path;

use binary_rw::{FileStream, MemoryStream, OpenType};
use clap::{arg, command, Command};

fn main() -> anyhow::Result<()> {
    let matches = command!()
        .arg(arg!(path: <PATH> "Input path"))
        .subcommand(Command::new("compress").arg(arg!(output: <OUTPUT> "Output path")))
        .subcommand(Command::new("decompress").arg(arg!(output: <OUTPUT> "Output path")))
        .get_matches();

    let path = matches.get_one::<String>("path").unwrap();

    if let Some(matches) = matches.subcommand_matches("compress") {
        let output = matches.get_one::<String>("output").unwrap();
        compress_file(path, output)?;
    } else if let Some(matches) = matches.subcommand_matches("decompress") {
        let output = matches.get_one::<String>("output").unwrap();
        decompress_file(path, output)?;
    } else {
        inspect_file(path)?;
    }

    Ok(())
}

fn compress_file(path: &str, output: &str) -> anyhow::Result<()> {
    let data = std::fs::read(path)?;
    let mut sink = FileStream::new(Path::new(output), OpenType::OpenAndCreate)?;
    let stats = codec::compress(&data, &mut sink)?;

    println!("Unique symbols: {}", stats.unique_symbols);
    println!("Padding bits: {}", stats.padding_bits);
    println!("{} bytes in, {} bytes out", data.len(), stats.archive_bytes());
    Ok(())
}

fn decompress_file(path: &str, output: &str) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)?;
    let mut source = MemoryStream::from(bytes);
    let mut sink = FileStream::new(Path::new(output), OpenType::OpenAndCreate)?;
    codec::decompress(&mut source, &mut sink)?;

    println!("Decompressed into '{output}'");
    Ok(())
}

fn inspect_file(path: &str) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)?;
    let mut source = MemoryStream::from(bytes);
    let (header, records) = codec::read_archive_summary(&mut source)?;

    println!("Padding bits: {}", header.padding_bits);
    println!("Unique symbols: {}", header.unique_symbols);
    for record in records {
        println!("\t{:#04x}\t{}", record.symbol, record.code);
    }
    Ok(())
}
