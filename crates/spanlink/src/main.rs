fn main() -> anyhow::Result<()> {
    spanlink::cli::run()
}
