mod board_size;
mod command;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
