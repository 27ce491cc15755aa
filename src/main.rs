use setup_npm_auth::cli;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    cli::init_tracing();
    cli::exit_code(cli::execute(args).await)
}
