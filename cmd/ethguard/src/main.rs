mod cli;
mod commands;

fn main() -> eyre::Result<()> {
    cli::start()
}
