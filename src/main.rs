fn main() -> anyhow::Result<()> {
    let command_line_interface = proto_static::cli::CommandLineInterface::load();
    command_line_interface.run()
}
