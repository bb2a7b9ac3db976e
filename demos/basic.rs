/// Basic example demonstrating streaming archive generation
///
/// Run with: cargo run --example basic
use std::error::Error;
use std::fs::File;
use std::io;

use tarstream_rs::{EntryOptions, TarSource, TarStream};

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Tarstream-rs Basic Example ===\n");

    let entries = vec![
        TarSource::from_text(
            EntryOptions::new("readme.txt"),
            "This is a readme file for the basic example.\n",
        ),
        TarSource::from_text(
            EntryOptions::new("data.json").with_mode(600),
            r#"{"name": "Basic Example", "version": "1.0.0"}"#,
        ),
        TarSource::from_bytes(
            EntryOptions::new("binary.dat").with_owner(1000, 1000),
            vec![0u8; 1000],
        ),
    ];

    println!("1. Streaming archive to example_basic.tar...");
    let mut stream = TarStream::new(entries);
    let mut file = File::create("example_basic.tar")?;
    let written = io::copy(&mut stream, &mut file)?;

    println!("   ✓ Wrote {written} bytes ({} blocks)", written / 512);
    println!("\n✓ Example complete!");
    Ok(())
}
