mod command;
mod oracle;

fn main() -> anyhow::Result<()> {
    command::run()
}
