use dexcode::{Dex, DexOptions};
use std::env;
use std::error::Error;
use std::path::Path;

// Prints every class of a dex file with its methods, each instruction tagged
// with the source line it belongs to.

//Usage: dexdump <dex-file> [class-descriptor]
fn main()
{
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: dexdump <dex-file> [class-descriptor]");
        return;
    }

    // Do everything else with the error trap
    match dump_dex(&args[1], args.get(2).map(String::as_str)) {
        Ok(_) => {}
        Err(e) => {
            println!("Aborted due to error: {}", e);
        }
    }
}

fn dump_dex(dex_file: &str, only: Option<&str>) -> Result<(), Box<dyn Error>>
{
    let dex = Dex::from_file_with_options(Path::new(dex_file), DexOptions::strict())?;
    println!("dex version {:03}, {} classes", dex.version(), dex.classes().len());

    let classes = match only {
        Some(name) => vec![dex.class(name)?],
        None => dex.classes().values().collect(),
    };

    for class in classes {
        let mut header = class.access_flags().keywords(false).join(" ");
        if !header.is_empty() {
            header.push(' ');
        }
        println!("\nclass {}{}", header, class.name());
        if let Some(superclass) = class.superclass() {
            println!("  extends {}", superclass);
        }
        for interface in class.interfaces() {
            println!("  implements {}", interface);
        }
        if let Some(source) = class.source_file() {
            println!("  source {}", source);
        }

        for field in class.fields().values() {
            println!("  field {} {}", field.name(), field.type_desc());
        }

        for (key, method) in class.methods() {
            let code = method.byte_code();
            println!(
                "  method {} {} registers={} ins={} outs={}",
                key,
                method.descriptor(),
                code.registers_size(),
                code.ins_size(),
                code.outs_size()
            );
            if method.is_native() {
                println!("    (no code)");
                continue;
            }
            for insn in code.instructions() {
                match code.line_for_offset(insn.offset) {
                    Some(line) => println!("    {:04x} [{:>4}] {}", insn.offset, line, insn),
                    None => println!("    {:04x} [    ] {}", insn.offset, insn),
                }
            }
        }
    }

    Ok(())
}
