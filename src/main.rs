fn main() {
    if let Err(err) = csv_fieldset::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
