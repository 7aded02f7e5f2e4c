fn main() {
    match wrapper::run(std::env::args_os().collect()) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
