use anyhow::Result;

fn main() -> Result<()> {
    kinship_cli::main_entry()
}
