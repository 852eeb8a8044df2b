use cnippet::cli;

fn main() -> anyhow::Result<()> {
    if let Err(e) = cli::run() {
        let msg = e.to_string();
        // Facade failures have already been reported as fatal diagnostics;
        // exit without printing the error object again.
        if msg.contains("constraint generation failed") || msg.contains("constraint solving failed")
        {
            std::process::exit(1);
        }
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
    Ok(())
}
