/// Display version information
pub fn execute() {
    println!("phloem {}", env!("CARGO_PKG_VERSION"));
    println!("Operator CLI for the Phloem community fund engine");
}
