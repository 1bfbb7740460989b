//! directmap CLI - Convert a JSON document to RDF triples by direct mapping.
//!
//! Usage:
//!   directmap-cli --input data.json --namespace https://data.example.org/ns/source#
//!   directmap-cli --input - --instance-namespace https://data.example.org/id/ --output data.nt
//!   cat data.json | directmap-cli

use clap::Parser;
use directmap::ntriples::write_ntriples;
use directmap::{parse_json, MappingOptions};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

#[derive(Parser, Debug)]
#[command(name = "directmap-cli")]
#[command(about = "Convert JSON documents to RDF triples by direct mapping")]
struct Args {
    /// Input JSON file path ('-' for stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Base namespace used to build predicates from object keys
    #[arg(short, long, default_value = "http://localhost/")]
    namespace: String,

    /// Namespace for sequentially numbered subjects (blank nodes when omitted)
    #[arg(long)]
    instance_namespace: Option<String>,

    /// Output N-Triples file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut options = MappingOptions::new(args.namespace);
    if let Some(instance_namespace) = args.instance_namespace {
        options = options.with_instance_namespace(instance_namespace);
    }

    let reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(File::open(&args.input)?))
    };

    let triples = parse_json(reader, options);

    let count = match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let count = write_ntriples(triples, &mut writer)?;
            writer.flush()?;
            count
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let count = write_ntriples(triples, &mut writer)?;
            writer.flush()?;
            count
        }
    };

    eprintln!("Wrote {} triples", count);
    Ok(())
}
