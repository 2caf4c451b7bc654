use std::process;

fn main() {
    if let Err(e) = ember_drv::main() {
        eprintln!("{e}");
        process::exit(1);
    }
}
