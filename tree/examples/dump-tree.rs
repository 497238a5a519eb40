use std::env;
use std::error::Error;
use std::fs;

fn main() -> Result<(), Box<dyn Error>> {
    let file_path = env::args().nth(1).ok_or("Missing file path")?;
    let contents = fs::read(file_path)?;
    let document = tidyxml_tree::parse(&contents)?;
    for (prefix, uri) in document.namespaces().bindings() {
        println!("xmlns:{} = {}", prefix, uri);
    }
    for node in document.node().iter() {
        match node.name() {
            Some(name) => println!("{} {:?}", name, node.attributes()),
            None => println!("{:?} {:?}", node.tag(), node.text()),
        }
    }
    Ok(())
}
