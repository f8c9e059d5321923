fn main() -> Result<(), Box<dyn std::error::Error>> {
    localchat::cli::main()
}
