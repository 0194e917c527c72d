use std::process;

fn main() {
    if let Err(err) = relink::app::run() {
        eprintln!("fatal: {err}");
        process::exit(1);
    }
}
