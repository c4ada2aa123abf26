use autorm_cli::AutormCli;

fn main() -> anyhow::Result<()> {
    AutormCli::new().parse_and_run()
}
