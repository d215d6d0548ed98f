use nom_locate::LocatedSpan;
use nom_tracable::{histogram, TracableInfo};
use pactbrick::Structure;
use std::{fs::File, io::Read, path::PathBuf};
use structopt::StructOpt;

/// Print the xref table, trailer and objects of a PDF file.
///
/// Build with `--features trace` to trace the parsers.
#[derive(StructOpt, Debug)]
#[structopt(name = "pactbrick-inspect")]
struct Opt {
    /// Input file
    #[structopt(short, long, parse(from_os_str))]
    input: PathBuf,

    /// Also print every object
    #[structopt(short, long)]
    objects: bool,
}

pub fn main() {
    env_logger::init();
    let opt = Opt::from_args();

    let mut buf = Vec::new();
    if let Err(e) = File::open(&opt.input).and_then(|mut f| f.read_to_end(&mut buf)) {
        log::error!("Could not read {}: {}", opt.input.display(), e);
        return;
    }
    let info = TracableInfo::new().forward(true).backward(true);
    let input = LocatedSpan::new_extra(&buf[..], info);

    let structure = match Structure::read(input) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Error while parsing: {:?}", e);
            return;
        }
    };
    histogram();

    println!("PDF-{}.{} (binary marker: {})", structure.version.0, structure.version.1, structure.binary);
    println!("startxref: {}", structure.startxref);
    println!("{:#?}", structure.trailer);
    match structure.verify() {
        Ok(()) => println!("xref: {} entries, all offsets valid", structure.xref.len()),
        Err(e) => println!("xref: {}", e),
    }

    if opt.objects {
        for number in structure.object_numbers() {
            match structure.object(number) {
                Ok(obj) => println!("{} 0 obj {}", number, obj),
                Err(e) => println!("{} 0 obj: {}", number, e),
            }
        }
    }
}
