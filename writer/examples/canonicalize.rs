use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn Error>> {
    let file_path = env::args().nth(1).ok_or("Missing file path")?;
    let contents = fs::read(file_path)?;
    let document = tidyxml_tree::parse(&contents)?;
    let bytes = tidyxml_writer::to_vec(&document)?;
    io::stdout().write_all(&bytes)?;
    Ok(())
}
